//! Tests for the per-seam store of displaced samples

#[cfg(test)]
mod tests {
    use texturize::spatial::canvas::Raster;
    use texturize::spatial::seams::{SeamMemory, SeamSide};

    fn uniform(width: usize, height: usize, value: u8) -> Raster {
        Raster::from_samples(width, height, 1, vec![value; width * height])
            .unwrap_or_else(|e| unreachable!("valid raster rejected: {e}"))
    }

    // Tests neighbours across each side and the edge of the grid
    // Verified by stepping along the seam instead of across it
    #[test]
    fn test_seam_side_geometry() {
        assert_eq!(SeamSide::West.offset(), [-1, 0]);
        assert_eq!(SeamSide::North.offset(), [0, -1]);
        assert_eq!(SeamSide::West.step_back([2, 5]), Some([1, 5]));
        assert_eq!(SeamSide::North.step_back([2, 5]), Some([2, 4]));
        assert_eq!(SeamSide::West.step_back([0, 5]), None);
        assert_eq!(SeamSide::North.step_back([2, 0]), None);
    }

    // Tests a record keeps the displaced pixel and the sample across the seam per side
    // Verified by sharing one store between both sides
    #[test]
    fn test_record_per_side() {
        let mut memory = SeamMemory::new(3, 3, 1);
        let Ok(canvas) = Raster::from_samples(3, 3, 1, (10..19).collect()) else {
            unreachable!("valid raster rejected");
        };
        let patch = uniform(2, 2, 40);

        memory.record(SeamSide::West, [1, 2], &canvas, &patch, [0, 1]);

        assert_eq!(memory.displaced(SeamSide::West).sample([1, 2], 0), Some(17));
        assert_eq!(memory.across(SeamSide::West).sample([1, 2], 0), Some(40));
        assert_eq!(memory.displaced(SeamSide::North).sample([1, 2], 0), Some(0));
        assert_eq!(memory.displaced(SeamSide::West).sample([0, 2], 0), Some(0));

        // A later cut through the same pixel replaces the record
        memory.record(SeamSide::West, [1, 2], &patch, &canvas, [0, 0]);
        assert_eq!(memory.across(SeamSide::West).sample([1, 2], 0), Some(10));
    }

    // Tests crossing a seam compares both hidden samples against the new patch
    // Verified by dropping the term for the pixel across the seam
    #[test]
    fn test_crossing_cost() {
        let mut memory = SeamMemory::new(4, 4, 1);
        memory.record(SeamSide::North, [2, 2], &uniform(4, 4, 10), &uniform(4, 4, 13), [0, 0]);

        let Ok(patch) = Raster::from_samples(2, 2, 1, vec![11, 12, 14, 16]) else {
            unreachable!("valid raster rejected");
        };

        // [1, 1] against 10, and [1, 0] against 13
        assert_eq!(memory.crossing_cost(SeamSide::North, [2, 2], &patch, [1, 1]), 36 + 1);
        // Top row has no pixel across the seam inside the patch
        assert_eq!(memory.crossing_cost(SeamSide::North, [2, 2], &patch, [1, 0]), 4);
    }

    // Tests every channel is kept and compared
    // Verified by keeping only the first channel
    #[test]
    fn test_multichannel_record() {
        let mut memory = SeamMemory::new(2, 1, 3);
        let Ok(canvas) = Raster::from_samples(2, 1, 3, vec![1, 2, 3, 4, 5, 6]) else {
            unreachable!("valid raster rejected");
        };
        memory.record(SeamSide::West, [1, 0], &canvas, &canvas, [0, 0]);

        assert_eq!(memory.displaced(SeamSide::West).pixel([1, 0]), Some(vec![4, 5, 6]));
        assert_eq!(memory.across(SeamSide::West).pixel([1, 0]), Some(vec![1, 2, 3]));
        assert_eq!(memory.crossing_cost(SeamSide::West, [1, 0], &canvas, [1, 0]), 0);
    }
}
