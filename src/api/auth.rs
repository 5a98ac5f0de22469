/// 認証ヘッダー
///
/// ユーザー設定の認証情報から Authorization ヘッダーを生成します。
/// Bearer トークンと HTTP Basic 認証に対応します。
use crate::config::AuthConfig;
use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};

/// 認証マネージャー
pub struct AuthManager {
    auth: AuthConfig,
}

impl AuthManager {
    /// 新しい認証マネージャーを作成
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }

    /// Authorization ヘッダーの値を生成
    ///
    /// # Returns
    /// "Bearer <token>" または "Basic <base64(username:password)>" 形式の文字列
    pub fn get_auth_header(&self) -> String {
        match &self.auth {
            AuthConfig::Bearer { token } => format!("Bearer {}", token),
            AuthConfig::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                format!("Basic {}", encoded)
            }
        }
    }

    /// Authorization ヘッダーを既存のヘッダーに追加
    ///
    /// 値はログに出ないよう sensitive としてマークします。
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&self.get_auth_header())?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// 認証方式の名前
    pub fn scheme(&self) -> &'static str {
        match self.auth {
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::Basic { .. } => "basic",
        }
    }

    /// 表示用にマスキングした認証情報
    pub fn get_masked_identity(&self) -> String {
        match &self.auth {
            AuthConfig::Bearer { token } => mask(token),
            AuthConfig::Basic { username, .. } => username.clone(),
        }
    }
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}
