use horizon_studio::{
    logger::{self, LoggerConfig},
    AspectRatio, Config, GenerationOptions, GenerationRequest, ImageArtifact, Studio,
};
use std::env;
use std::fs;

const USAGE: &str = "usage:
  horizon-studio image <prompt> [aspect-ratio] [style]
  horizon-studio story <script> [frames] [style]
  horizon-studio code <prompt>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, input) = match (args.first(), args.get(1)) {
        (Some(command), Some(input)) => (command.as_str(), input.as_str()),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let mut studio = match Studio::from_config(config) {
        Ok(studio) => studio,
        Err(e) => {
            log::error!("❌ Failed to initialize client: {}", e);
            return Err(e.into());
        }
    };

    match command {
        "image" => {
            let aspect_ratio = match args.get(2) {
                Some(ratio) => ratio.parse()?,
                None => AspectRatio::default(),
            };
            let options = GenerationOptions::new()
                .with_aspect_ratio(aspect_ratio)
                .with_style(args.get(3).cloned().unwrap_or_default());
            let artifact = studio
                .generate_image(&GenerationRequest::new(input, options))
                .await?;
            save(&artifact, "image")?;
        }
        "story" => {
            let frames = match args.get(2) {
                Some(n) => n.parse()?,
                None => 4,
            };
            let options = GenerationOptions::new()
                .with_aspect_ratio(AspectRatio::Portrait)
                .with_style(args.get(3).cloned().unwrap_or_default());
            let artifacts = studio
                .generate_story(input, frames, &options, |done, total| {
                    log::info!("📊 {}/{} frames attempted", done, total);
                })
                .await?;
            if artifacts.is_empty() {
                log::error!("❌ No frames were generated");
            }
            for (i, artifact) in artifacts.iter().enumerate() {
                save(artifact, &format!("frame_{:02}", i + 1))?;
            }
        }
        "code" => {
            let code = studio.generate_code(input).await?;
            println!("{}", code);
        }
        other => {
            eprintln!("unknown command: {}\n{}", other, USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn save(artifact: &ImageArtifact, stem: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filename = format!(
        "{}_{}.{}",
        stem,
        chrono::Utc::now().timestamp(),
        artifact.extension()
    );
    fs::write(&filename, artifact.decode()?)?;
    log::info!("💾 Saved {}", filename);
    Ok(())
}
