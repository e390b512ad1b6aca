use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

define_paths!(PackPathRules {
    manifest: "mod-list.json",
});

/// Extension every downloadable mod archive carries.
pub const MOD_FILE_EXTENSION: &str = "zip";

/// Prefix of in-flight files inside a pack directory.
pub const TEMP_PREFIX: &str = ".";

impl PackPathRules {
    pub fn manifest_file_name() -> String {
        Self::default().manifest.into_string()
    }

    /// Whether `file_name` is bookkeeping rather than a mod file.
    pub fn is_internal(file_name: &str) -> bool {
        file_name.starts_with(TEMP_PREFIX) || file_name == Self::default().manifest.as_str()
    }
}
