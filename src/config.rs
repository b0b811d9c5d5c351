use std::collections::HashMap;

use crate::cert::CertificateSource;
use crate::crypto::verify::DigestAlgorithm;
use crate::error::VipsptError;

pub const SANDBOX_BASE_URL: &str = "http://47.107.41.218:8093";
pub const PRODUCTION_BASE_URL: &str = "http://www.vipspt.cn";

/// Notifications are signed with SHA1withRSA unless configured otherwise.
pub const DEFAULT_SIGN_TYPE: &str = "RSA";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub appid: String,
    pub secret_key: String,
    /// Sub-merchant id, sent as `merchant_id`.
    pub merchant_id: String,
    pub enterprise_reg: String,
    pub sandbox: bool,
    pub notify_url: Option<String>,
    /// Gateway certificate for notification and response verification.
    pub certificate: Option<CertificateSource>,
    pub sign_type: String,
    pub wechat_app_id: Option<String>,
    pub base_url: String,
}

pub struct ClientConfigBuilder {
    appid: Option<String>,
    secret_key: Option<String>,
    merchant_id: Option<String>,
    enterprise_reg: Option<String>,
    sandbox: bool,
    notify_url: Option<String>,
    public_key_path: Option<String>,
    public_key_data: Option<String>,
    sign_type: Option<String>,
    wechat_app_id: Option<String>,
    base_url: Option<String>,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            appid: None,
            secret_key: None,
            merchant_id: None,
            enterprise_reg: None,
            sandbox: false,
            notify_url: None,
            public_key_path: None,
            public_key_data: None,
            sign_type: None,
            wechat_app_id: None,
            base_url: None,
        }
    }

    /// Build from the trade service's per-channel key/value configuration.
    ///
    /// Empty values count as absent. `Sandbox` is required and takes the
    /// usual boolean spellings (`1`, `t`, `TRUE`, `false`, ...).
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, VipsptError> {
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let mut builder = ClientConfig::builder();
        if let Some(v) = get("Appid") {
            builder = builder.appid(v);
        }
        if let Some(v) = get("SecretKey") {
            builder = builder.secret_key(v);
        }
        if let Some(v) = get("SubMerId") {
            builder = builder.merchant_id(v);
        }
        if let Some(v) = get("EnterpriseReg") {
            builder = builder.enterprise_reg(v);
        }
        let sandbox = get("Sandbox")
            .ok_or_else(|| VipsptError::Config("Sandbox is required".into()))?;
        let sandbox = parse_bool(sandbox).ok_or_else(|| {
            VipsptError::Config(format!("Sandbox must be a boolean, got {sandbox:?}"))
        })?;
        builder = builder.sandbox(sandbox);
        if let Some(v) = get("NotifyUrl") {
            builder = builder.notify_url(v);
        }
        if let Some(v) = get("VipsptPublicKeyPath") {
            builder = builder.public_key_path(v);
        }
        if let Some(v) = get("VipsptPublicKeyData") {
            builder = builder.public_key_data(v);
        }
        if let Some(v) = get("SignType") {
            builder = builder.sign_type(v);
        }
        if let Some(v) = get("WechatAppId") {
            builder = builder.wechat_app_id(v);
        }
        builder.build()
    }

    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::from_sign_type(&self.sign_type)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Blank values are treated as missing.
fn required(value: Option<String>, field: &str) -> Result<String, VipsptError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| VipsptError::Config(format!("{field} is required")))
}

impl ClientConfigBuilder {
    pub fn appid(mut self, appid: impl Into<String>) -> Self {
        self.appid = Some(appid.into());
        self
    }

    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    pub fn enterprise_reg(mut self, enterprise_reg: impl Into<String>) -> Self {
        self.enterprise_reg = Some(enterprise_reg.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn notify_url(mut self, notify_url: impl Into<String>) -> Self {
        self.notify_url = Some(notify_url.into());
        self
    }

    pub fn public_key_path(mut self, path: impl Into<String>) -> Self {
        self.public_key_path = Some(path.into());
        self
    }

    /// Base64 of the certificate file contents.
    pub fn public_key_data(mut self, data: impl Into<String>) -> Self {
        self.public_key_data = Some(data.into());
        self
    }

    pub fn sign_type(mut self, sign_type: impl Into<String>) -> Self {
        self.sign_type = Some(sign_type.into());
        self
    }

    pub fn wechat_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.wechat_app_id = Some(app_id.into());
        self
    }

    /// Override the sandbox/production base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig, VipsptError> {
        let appid = required(self.appid, "appid")?;
        let secret_key = required(self.secret_key, "secret_key")?;
        let merchant_id = required(self.merchant_id, "merchant_id")?;
        let enterprise_reg = required(self.enterprise_reg, "enterprise_reg")?;

        let certificate = match (&self.public_key_path, &self.public_key_data) {
            (None, None) => None,
            (path, data) => Some(CertificateSource::from_parts(
                path.as_deref(),
                data.as_deref(),
            )?),
        };

        let base_url = self.base_url.unwrap_or_else(|| {
            if self.sandbox {
                SANDBOX_BASE_URL.to_string()
            } else {
                PRODUCTION_BASE_URL.to_string()
            }
        });

        Ok(ClientConfig {
            appid,
            secret_key,
            merchant_id,
            enterprise_reg,
            sandbox: self.sandbox,
            notify_url: self.notify_url,
            certificate,
            sign_type: self.sign_type.unwrap_or_else(|| DEFAULT_SIGN_TYPE.to_string()),
            wechat_app_id: self.wechat_app_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ClientConfigBuilder {
        ClientConfig::builder()
            .appid("00000051")
            .secret_key("s3cr3t")
            .merchant_id("M100")
            .enterprise_reg("E200")
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_build_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.sign_type, "RSA");
        assert_eq!(config.digest_algorithm(), DigestAlgorithm::Sha1);
        assert!(config.certificate.is_none());
        assert!(config.notify_url.is_none());
    }

    #[test]
    fn test_sandbox_selects_base_url() {
        let config = minimal().sandbox(true).build().unwrap();
        assert_eq!(config.base_url, SANDBOX_BASE_URL);
    }

    #[test]
    fn test_base_url_override_wins() {
        let config = minimal()
            .sandbox(true)
            .base_url("http://localhost:9000/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_missing_required_fields() {
        let err = ClientConfig::builder().build().unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "appid is required"));

        let err = ClientConfig::builder()
            .appid("a")
            .secret_key("s")
            .merchant_id("m")
            .build()
            .unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "enterprise_reg is required"));
    }

    #[test]
    fn test_blank_required_fields_rejected() {
        let err = minimal().appid("").build().unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "appid is required"));

        let err = minimal().secret_key("   ").build().unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "secret_key is required"));

        let err = minimal().merchant_id("\t").build().unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "merchant_id is required"));

        let err = minimal().enterprise_reg(" \n").build().unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "enterprise_reg is required"));
    }

    #[test]
    fn test_both_certificate_sources_rejected() {
        let err = minimal()
            .public_key_path("/etc/vipspt.cer")
            .public_key_data("TUlJ")
            .build()
            .unwrap_err();
        assert!(matches!(err, VipsptError::Config(_)));
    }

    #[test]
    fn test_from_map() {
        let config = ClientConfig::from_map(&map(&[
            ("Appid", "00000051"),
            ("SecretKey", "s3cr3t"),
            ("SubMerId", "M100"),
            ("EnterpriseReg", "E200"),
            ("Sandbox", "true"),
            ("NotifyUrl", "https://trade.example.com/notify/vipspt"),
            ("VipsptPublicKeyPath", "/etc/vipspt.cer"),
            ("SignType", "RSA2"),
            ("WechatAppId", "wxb3fa"),
            ("VipsptPublicKeyData", ""),
        ]))
        .unwrap();
        assert_eq!(config.merchant_id, "M100");
        assert_eq!(config.base_url, SANDBOX_BASE_URL);
        assert_eq!(config.digest_algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(
            config.certificate,
            Some(CertificateSource::Path("/etc/vipspt.cer".into()))
        );
        assert_eq!(config.wechat_app_id.as_deref(), Some("wxb3fa"));
    }

    #[test]
    fn test_from_map_rejects_bad_sandbox() {
        let err = ClientConfig::from_map(&map(&[
            ("Appid", "a"),
            ("SecretKey", "s"),
            ("SubMerId", "m"),
            ("EnterpriseReg", "e"),
            ("Sandbox", "yes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg.contains("Sandbox")));
    }

    #[test]
    fn test_from_map_missing_key() {
        let err = ClientConfig::from_map(&map(&[("Appid", "a"), ("Sandbox", "false")]))
            .unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "secret_key is required"));
    }

    #[test]
    fn test_from_map_requires_sandbox() {
        let creds = [
            ("Appid", "a"),
            ("SecretKey", "s"),
            ("SubMerId", "m"),
            ("EnterpriseReg", "e"),
        ];
        let err = ClientConfig::from_map(&map(&creds)).unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "Sandbox is required"));

        let mut blank = map(&creds);
        blank.insert("Sandbox".into(), " ".into());
        let err = ClientConfig::from_map(&blank).unwrap_err();
        assert!(matches!(err, VipsptError::Config(msg) if msg == "Sandbox is required"));
    }

    #[test]
    fn test_from_map_sandbox_spellings() {
        let creds = [
            ("Appid", "a"),
            ("SecretKey", "s"),
            ("SubMerId", "m"),
            ("EnterpriseReg", "e"),
        ];
        for (raw, expected) in [
            ("1", true),
            ("t", true),
            ("T", true),
            ("TRUE", true),
            ("true", true),
            ("True", true),
            ("0", false),
            ("f", false),
            ("F", false),
            ("FALSE", false),
            ("false", false),
            ("False", false),
        ] {
            let mut m = map(&creds);
            m.insert("Sandbox".into(), raw.into());
            let config = ClientConfig::from_map(&m).unwrap();
            assert_eq!(config.sandbox, expected, "Sandbox={raw}");
        }

        for raw in ["tRuE", "yes", "2"] {
            let mut m = map(&creds);
            m.insert("Sandbox".into(), raw.into());
            assert!(ClientConfig::from_map(&m).is_err(), "Sandbox={raw}");
        }
    }
}
