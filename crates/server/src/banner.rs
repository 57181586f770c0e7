const BANNER: &str = r#"
  ___  ___ _ __(_) ___  ___
 / __|/ _ \ '__| |/ _ \/ __|
 \__ \  __/ |  | |  __/\__ \
 |___/\___|_|  |_|\___||___/  tracker
"#;

pub fn print_banner(version: &str) {
    for line in BANNER.lines().filter(|l| !l.is_empty()) {
        tracing::info!("{}", line);
    }
    tracing::info!("series-tracker v{}", version);
}
