use crate::error::{KakeiboError, Result};
use crate::settings::{
    effective_settings, load_settings, save_settings, settings_path, API_URL_ENV,
};

pub fn show() -> Result<()> {
    let path = settings_path();
    let settings = effective_settings();
    let source = if std::env::var(API_URL_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        API_URL_ENV.to_string()
    } else if path.exists() {
        path.display().to_string()
    } else {
        "default".to_string()
    };

    println!("Settings:   {}", path.display());
    println!("API URL:    {} ({source})", settings.api_url);
    println!("User ID:    {}", settings.user_id);
    println!("Currency:   {}", settings.currency_symbol);
    Ok(())
}

pub fn set(api_url: Option<String>, user_id: Option<i64>, currency: Option<String>) -> Result<()> {
    if api_url.is_none() && user_id.is_none() && currency.is_none() {
        return Err(KakeiboError::InvalidArgument(
            "nothing to set (pass --url, --user-id or --currency)".into(),
        ));
    }
    let mut settings = load_settings();
    if let Some(url) = api_url {
        settings.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(id) = user_id {
        settings.user_id = id;
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }
    save_settings(&settings)?;
    println!("Saved {}", settings_path().display());
    Ok(())
}
