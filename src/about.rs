pub const SILICA_DISPLAY_VERSION: &str = env!("SILICA_DISPLAY_VERSION");
pub const SILICA_BUILD_N: &str = env!("SILICA_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "silica {}\nBuild {}\nClient for the silica primer analysis service",
        SILICA_DISPLAY_VERSION, SILICA_BUILD_N
    )
}
