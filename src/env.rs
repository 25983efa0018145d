use super::*;

pub fn load_env_file() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_path = current_dir.join(".env");

    // A missing .env is fine when the variables come from the real environment.
    if dotenv().is_err() {
        warn!(
            ".env file not found. Expected it at: {}, using process environment",
            env_path.display()
        );
    } else {
        info!(".env loading at: {}", env_path.display());
    }
}

pub fn report_missing_keys(config: &Config) {
    if config.secret_key.is_none() {
        warn!("STRIPE_SECRET_KEY is not set, payment intent calls will fail");
    }
    if config.publishable_key.is_none() {
        warn!("STRIPE_PUBLISHABLE_KEY is not set, the checkout widget cannot load");
    }
    if config.webhook_secret.is_none() {
        warn!("STRIPE_WEBHOOK_SECRET is not set, every webhook will be refused");
    }
}
