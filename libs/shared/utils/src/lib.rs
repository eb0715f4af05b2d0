pub mod extractor;
pub mod tenant;
pub mod test_utils;
