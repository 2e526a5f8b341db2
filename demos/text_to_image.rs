use colored::*;
use dial_client::{
    models::{ImageGenerationOptions, ImageQuality, ImageSize, ImageStyle, Message},
    BucketClient, DialConfig, ModelClient,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "Sunny day in Malaga with logo of DialX";

/// Generates an image with DALL-E 3 and saves every returned attachment locally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DialConfig::from_env()?;
    let client = ModelClient::from_config(&config, "dall-e-3")?;

    // Size, style and quality are DALL-E parameters; Google's
    // imagegeneration@005 ignores them.
    let options = ImageGenerationOptions::builder()
        .size(ImageSize::Square)
        .style(ImageStyle::Vivid)
        .quality(ImageQuality::Hd)
        .build();

    let response = client
        .get_completion(&[Message::user(PROMPT)], Some(options.into()))
        .await?;

    let attachments = response.attachments();
    if attachments.is_empty() {
        println!("{}", "No images were generated in the response".yellow());
        return Ok(());
    }

    let bucket = BucketClient::from_config(&config)?;
    let results = bucket.resolve_attachments(attachments).await;

    for (i, (attachment, result)) in attachments.iter().zip(results).enumerate() {
        match result {
            Ok(bytes) => {
                let file_name = format!("generated_image_{}.{}", i, attachment.file_extension());
                tokio::fs::write(&file_name, bytes).await?;
                println!("{} {}", "✅ Saved:".green(), file_name);
            }
            Err(e) => eprintln!("{} attachment {}: {}", "⚠️ Skipping".yellow(), i, e),
        }
    }
    println!("Generated {} image(s)", attachments.len());

    Ok(())
}
