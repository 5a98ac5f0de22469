/// プレゼンテーション層: ユーザー入力処理
///
/// CLI引数やstdinからのユーザー入力を取得し、
/// アプリケーション層で使用可能な形式に変換します。
use crate::config::AuthConfig;
use anyhow::{Context, Result, bail};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::io::{self, BufRead, Write};

/// 対話的に認証情報を取得
pub fn read_credentials_interactive(basic: bool) -> Result<AuthConfig> {
    eprintln!("Storing credentials for the upload server.");
    eprintln!();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if basic {
        let username = prompt(&mut input, "Username: ", "username")?;
        let password = prompt(&mut input, "Password: ", "password")?;
        Ok(AuthConfig::Basic { username, password })
    } else {
        let token = prompt(&mut input, "Bearer token: ", "token")?;
        Ok(AuthConfig::Bearer { token })
    }
}

/// stdin からパイプで認証情報を取得
///
/// 形式:
///   bearer: 1行目 = トークン
///   basic:  1行目 = ユーザー名, 2行目 = パスワード
pub fn read_credentials_from_stdin(basic: bool) -> Result<AuthConfig> {
    let stdin = io::stdin();
    read_credentials_from(stdin.lock(), basic)
}

fn read_credentials_from(mut input: impl BufRead, basic: bool) -> Result<AuthConfig> {
    if basic {
        let username = read_field(&mut input, "username", "first")?;
        let password = read_field(&mut input, "password", "second")?;
        Ok(AuthConfig::Basic { username, password })
    } else {
        let token = read_field(&mut input, "token", "first")?;
        Ok(AuthConfig::Bearer { token })
    }
}

fn prompt(input: &mut impl BufRead, label: &str, field: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    read_field(input, field, "next")
}

fn read_field(input: &mut impl BufRead, field: &str, line: &str) -> Result<String> {
    let mut value = String::new();
    input
        .read_line(&mut value)
        .with_context(|| format!("Failed to read {} from input", field))?;
    let value = value.trim().to_string();

    if value.is_empty() {
        bail!(
            "The {} cannot be empty. Please ensure the {} line of input contains it.",
            field,
            line
        );
    }
    Ok(value)
}

/// `--header "Name: value"` 形式の指定を HeaderMap に変換
pub fn parse_headers(specs: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for spec in specs {
        let (name, value) = spec
            .split_once(':')
            .with_context(|| format!("Invalid header '{}'. Expected 'Name: value'.", spec))?;

        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name in '{}'", spec))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid header value in '{}'", spec))?;
        headers.append(name, value);
    }
    Ok(headers)
}
