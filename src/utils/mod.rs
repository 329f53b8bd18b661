pub mod ffmpeg;
pub mod fs;
pub mod path;

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / crate::constants::BYTES_PER_MB
}

/// Percentage saved going from `original` to `compressed` bytes, 0 when there is nothing to compare against.
pub fn reduction_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }

    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_of_a_quarter() {
        assert_eq!(reduction_percent(400, 100), 75.0);
        assert_eq!(reduction_percent(100, 100), 0.0);
        assert!(reduction_percent(100, 150) < 0.0);
    }

    #[test]
    fn reduction_without_original_is_zero() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(0, 10), 0.0);
    }

    #[test]
    fn megabytes_are_binary() {
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
    }
}
