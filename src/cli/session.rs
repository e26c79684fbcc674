use super::ui;
use crate::core::{Session, SessionToken};
use crate::store::TokenStore;
use anyhow::Result;

/// Stores an externally issued token for later commands and starts the
/// session with it.
pub async fn login(store: &dyn TokenStore, session: &Session, raw_token: &str) -> Result<()> {
    let token = SessionToken::new(raw_token)?;
    store.save(&token).await?;
    session.begin(token);
    println!("{}", ui::style_text("Session token saved.", ui::StyleType::Success));
    Ok(())
}

pub async fn logout(store: &dyn TokenStore, session: &Session) -> Result<()> {
    store.clear().await?;
    session.end();
    println!("{}", ui::style_text("Session token removed.", ui::StyleType::Subtle));
    Ok(())
}
