use colored::*;
use dial_client::{models::Message, BucketClient, DialConfig, ModelClient};
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Uploads an image to the bucket and asks several vendors' models about it
/// through an attachment, letting the gateway adapt the format per vendor.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let image_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dialx-banner.png".to_string());

    let config = DialConfig::from_env()?;
    let bucket = BucketClient::from_config(&config)?;

    let attachment = bucket.put_path(&image_path).await?;
    println!("{} {:?}", "✓ Uploaded".green(), attachment);

    let message = Message::user("What do you see on this picture?")
        .with_custom_content(vec![attachment]);

    for deployment in ["gpt-4o", "gemini-2.5-pro", "anthropic.claude-v3-haiku"] {
        println!("\n{}", deployment.bright_blue().bold());
        let client = ModelClient::from_config(&config, deployment)?;
        match client.get_completion(std::slice::from_ref(&message), None).await {
            Ok(response) => println!("{}", response.text()),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        }
    }

    Ok(())
}
