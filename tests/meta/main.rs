//! Structural checks keeping the unit test tree aligned with `src` and the manifest honest
