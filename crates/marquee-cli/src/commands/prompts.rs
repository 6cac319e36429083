use color_eyre::Result;
use dialoguer::Confirm;

/// Prompt for yes/no with a default
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Read the TMDB API key without echoing it
pub fn prompt_api_key() -> Result<String> {
    let key = rpassword::prompt_password("TMDB API key: ")
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read API key: {}", e))?;
    Ok(key.trim().to_string())
}
