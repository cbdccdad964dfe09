// components/media_downloader/src/utils.rs
use std::path::PathBuf;

/// Lower-case `name` and replace everything but ASCII letters and digits with `_`
pub fn sanitize_title(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// File name for a track downloaded at `timestamp_ms`
pub fn generate_filename(title: &str, timestamp_ms: i64) -> PathBuf {
    PathBuf::from(format!("{}_{}.wav", sanitize_title(title), timestamp_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Shape of You"), "shape_of_you");
        assert_eq!(sanitize_title("F*CK LOVE 3"), "f_ck_love_3");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_title("÷ (Divide)"), "___divide_");
    }

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("Blinding Lights", 1_700_000_000_000);
        assert_eq!(filename, PathBuf::from("blinding_lights_1700000000000.wav"));
    }
}
