#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;

    use anyhow::{anyhow, Context, Result};

    use quad_viewer::app::{self, WindowInitError};
    use quad_viewer::assets::load_image;
    use quad_viewer::{DemoConfig, Quad};

    const USAGE: &str = "Usage: quad-viewer [ASSET_DIR] [--texture NAME]... [--summary-only]";

    pub fn main() {
        let mut logger = env_logger::Builder::new();
        match env::var("RUST_LOG") {
            Ok(filter) => logger.parse_filters(&filter),
            Err(_) => logger.filter_level(log::LevelFilter::Info),
        };
        logger.init();

        if let Err(err) = run() {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }

    fn run() -> Result<()> {
        let options = CliOptions::parse(env::args().skip(1))?;
        let config = options.config;
        config.validate()?;

        if options.summary_only {
            return print_summary(&config);
        }
        match app::run(config.clone()) {
            Ok(()) => Ok(()),
            Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
                eprintln!(
                    "{err}. Falling back to --summary-only mode (set DISPLAY or install a windowing system to enable rendering)."
                );
                print_summary(&config)
            }
            Err(err) => Err(err),
        }
    }

    fn print_summary(config: &DemoConfig) -> Result<()> {
        for name in &config.textures {
            let image = load_image(config, name)
                .with_context(|| format!("failed to load texture {name}"))?;
            println!(
                "Loaded texture {} ({}x{}, {} mip levels)",
                image.name,
                image.width,
                image.height,
                image.mip_level_count()
            );
        }
        let [r, g, b, a] = config.clear_color;
        println!("Clear color: ({r:.2}, {g:.2}, {b:.2}, {a:.2})");
        let quad = Quad::new(config.quad_half_extent);
        println!(
            "Quad: {} vertices (triangle strip), half extent {:.2}",
            quad.vertices().len(),
            quad.half_extent().x
        );
        Ok(())
    }

    struct CliOptions {
        config: DemoConfig,
        summary_only: bool,
    }

    impl CliOptions {
        fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
            let mut config = DemoConfig::default();
            let mut textures: Vec<String> = Vec::new();
            let mut asset_dir = None;
            let mut summary_only = false;

            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--summary-only" => summary_only = true,
                    "--texture" => {
                        let Some(name) = args.next() else {
                            return Err(anyhow!("--texture expects a name\n{USAGE}"));
                        };
                        textures.push(name);
                    }
                    "-h" | "--help" => return Err(anyhow!(USAGE)),
                    flag if flag.starts_with('-') => {
                        return Err(anyhow!("Unknown argument: {flag}\n{USAGE}"));
                    }
                    path => {
                        if asset_dir.is_some() {
                            return Err(anyhow!("Unexpected argument: {path}\n{USAGE}"));
                        }
                        asset_dir = Some(path.to_string());
                    }
                }
            }

            if let Some(dir) = asset_dir {
                config.asset_base = dir;
            }
            if !textures.is_empty() {
                config.textures = textures;
            }
            Ok(Self {
                config,
                summary_only,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<CliOptions> {
            CliOptions::parse(args.iter().map(|arg| arg.to_string()))
        }

        #[test]
        fn no_arguments_uses_defaults() {
            let options = parse(&[]).unwrap();
            assert_eq!(options.config, DemoConfig::default());
            assert!(!options.summary_only);
        }

        #[test]
        fn texture_flags_replace_the_default_list() {
            let options = parse(&["art", "--texture", "dirt", "--texture", "sand"]).unwrap();
            assert_eq!(options.config.asset_base, "art");
            assert_eq!(options.config.textures, vec!["dirt", "sand"]);
        }

        #[test]
        fn rejects_unknown_flags_and_extra_paths() {
            assert!(parse(&["--fullscreen"]).is_err());
            assert!(parse(&["a", "b"]).is_err());
            assert!(parse(&["--texture"]).is_err());
        }
    }
}
