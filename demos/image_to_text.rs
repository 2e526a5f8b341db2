use colored::*;
use dial_client::{
    models::{ContentPart, Message},
    DialConfig, ModelClient,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

const IMAGE_URL: &str = "https://a-z-animals.com/media/2019/11/Elephant-male-1024x535.jpg";
const PROMPT: &str = "What do you see in this image? Describe it in detail.";

/// Asks a vision model about an image, first by URL and then inlined as base64.
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
    let client = ModelClient::from_config(&config, "gpt-4o")?;
    let system = Message::system("You are a helpful assistant.");

    println!("\n{}", "🌐 Analyzing image from URL".bright_blue().bold());
    let by_url = Message::user_parts(vec![
        ContentPart::text(PROMPT),
        ContentPart::image_url(IMAGE_URL),
    ]);
    let response = client
        .get_completion(&[system.clone(), by_url], None)
        .await?;
    println!("{}", response.text());

    println!(
        "\n{} {}",
        "🖼️  Analyzing local image".bright_blue().bold(),
        image_path.bright_black()
    );
    let inline = Message::user_parts(vec![
        ContentPart::text(PROMPT),
        ContentPart::image_from_path(&image_path)?,
    ]);
    let response = client.get_completion(&[system, inline], None).await?;
    println!("{}", response.text());

    Ok(())
}
