//! Basic text generation demo.

use roast::prelude::*;

#[tokio::main]
async fn main() -> roast::error::Result<()> {
    let settings = Settings::from_env()?;
    let client = InferenceClient::from_settings(&settings);

    let request = TextGenerationRequest::builder()
        .prompt("Can you please let us know more details about your ")
        .model(settings.model_id.clone())
        .build();

    let text = client.text_generation(&request).await?;
    println!("{text}");
    Ok(())
}
