use std::path::Path;

pub trait PathExtensions {
    fn get_file_name(&self) -> String;
    fn get_file_stem(&self) -> String;
    fn has_extension(&self, extension: &str) -> bool;
    fn track_number(&self) -> Option<u32>;
}

impl PathExtensions for Path {
    #[inline]
    fn get_file_name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[inline]
    fn get_file_stem(&self) -> String {
        self.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[inline]
    fn has_extension(&self, extension: &str) -> bool {
        self.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Leading ASCII digits of the file name, e.g. `07 Outro.m4a` -> 7.
    /// Zero is not a valid track.
    fn track_number(&self) -> Option<u32> {
        let name = self.get_file_name();
        let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();

        digits.parse::<u32>().ok().filter(|n| *n > 0)
    }
}
