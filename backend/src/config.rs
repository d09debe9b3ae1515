//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set with an `ITAM_<FIELD>` environment variable or the
//! matching command-line flag. Optional fields fall back to the defaults
//! exposed by the accessors below.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::NotificationSettings;
use crate::domain::notifications::DEFAULT_WINDOW_DAYS;
use crate::outbound::mail::SmtpSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAIL_PORT: u16 = 587;
const DEFAULT_LICENSE_CHECK_AT: &str = "09:00";
const DEFAULT_WARRANTY_CHECK_AT: &str = "09:30";

/// Runtime configuration for the server, the scheduler and the binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ITAM")]
pub struct AppSettings {
    /// Session key material; at least 32 bytes.
    pub secret_key: Option<String>,
    /// Allow a random session key outside debug builds.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub bind_addr: Option<String>,
    /// Send the session cookie with `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// SMTP relay host. Mail is unavailable when absent.
    pub mail_server: Option<String>,
    pub mail_port: Option<u16>,
    #[ortho_config(default = true)]
    pub mail_use_tls: bool,
    pub mail_username: Option<String>,
    pub mail_password: Option<String>,
    pub mail_default_sender: Option<String>,
    pub license_expiry_days: Option<u32>,
    pub warranty_expiry_days: Option<u32>,
    /// Code that lets a registrant pick the Admin role.
    pub admin_registration_code: Option<String>,
    #[ortho_config(default = true)]
    pub scheduler_enabled: bool,
    /// Daily license check, `HH:MM` local time.
    pub license_check_at: Option<String>,
    /// Daily warranty check, `HH:MM` local time.
    pub warranty_check_at: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub fn scheduler_enabled(&self) -> bool {
        self.scheduler_enabled
    }

    pub fn license_check_at(&self) -> &str {
        self.license_check_at
            .as_deref()
            .unwrap_or(DEFAULT_LICENSE_CHECK_AT)
    }

    pub fn warranty_check_at(&self) -> &str {
        self.warranty_check_at
            .as_deref()
            .unwrap_or(DEFAULT_WARRANTY_CHECK_AT)
    }

    /// Blank strings count as unset.
    pub fn admin_registration_code(&self) -> Option<String> {
        non_blank(self.admin_registration_code.as_deref())
    }

    /// Relay settings, or `None` when no server is configured.
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let server = non_blank(self.mail_server.as_deref())?;
        Some(SmtpSettings {
            server,
            port: self.mail_port.unwrap_or(DEFAULT_MAIL_PORT),
            use_tls: self.mail_use_tls,
            username: non_blank(self.mail_username.as_deref()),
            password: self.mail_password.clone(),
            default_sender: non_blank(self.mail_default_sender.as_deref()),
        })
    }

    /// Engine defaults; a zero window falls back to the built-in default.
    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings {
            license_window_days: positive_or_default(self.license_expiry_days),
            warranty_window_days: positive_or_default(self.warranty_expiry_days),
            default_sender: non_blank(self.mail_default_sender.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn positive_or_default(days: Option<u32>) -> u32 {
    days.filter(|d| *d > 0).unwrap_or(DEFAULT_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    //! Settings parsing against the process environment.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "ITAM_DATABASE_URL",
        "ITAM_BIND_ADDR",
        "ITAM_COOKIE_SECURE",
        "ITAM_MAIL_USE_TLS",
        "ITAM_SCHEDULER_ENABLED",
        "ITAM_MAIL_SERVER",
        "ITAM_MAIL_PORT",
        "ITAM_MAIL_DEFAULT_SENDER",
        "ITAM_LICENSE_EXPIRY_DAYS",
        "ITAM_WARRANTY_CHECK_AT",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("itam")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert!(settings.cookie_secure());
        assert!(settings.scheduler_enabled());
        assert!(settings.database_url.is_none());
        assert!(settings.smtp_settings().is_none());
        assert_eq!(settings.license_check_at(), "09:00");
        assert_eq!(settings.warranty_check_at(), "09:30");
        assert_eq!(settings.notification_settings(), NotificationSettings::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ITAM_DATABASE_URL", Some("postgres://localhost/itam".to_owned())),
            ("ITAM_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("ITAM_COOKIE_SECURE", Some("false".to_owned())),
            ("ITAM_MAIL_SERVER", Some("smtp.example.com".to_owned())),
            ("ITAM_MAIL_PORT", Some("2525".to_owned())),
            ("ITAM_MAIL_DEFAULT_SENDER", Some("it@example.com".to_owned())),
            ("ITAM_LICENSE_EXPIRY_DAYS", Some("14".to_owned())),
            ("ITAM_WARRANTY_CHECK_AT", Some("10:15".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/itam"));
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert!(!settings.cookie_secure());
        assert_eq!(settings.warranty_check_at(), "10:15");

        let smtp = settings.smtp_settings().expect("mail server configured");
        assert_eq!(smtp.server, "smtp.example.com");
        assert_eq!(smtp.port, 2525);
        assert!(smtp.use_tls);

        let notifications = settings.notification_settings();
        assert_eq!(notifications.license_window_days, 14);
        assert_eq!(notifications.warranty_window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(notifications.default_sender.as_deref(), Some("it@example.com"));
    }

    #[rstest]
    fn switches_default_on_when_unset() {
        let _guard = lock_env([
            ("ITAM_COOKIE_SECURE", None::<String>),
            ("ITAM_MAIL_USE_TLS", None),
            ("ITAM_SCHEDULER_ENABLED", None),
            ("ITAM_MAIL_SERVER", Some("smtp.example.com".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.cookie_secure);
        assert!(settings.mail_use_tls);
        assert!(settings.scheduler_enabled);
        assert!(settings.smtp_settings().expect("mail server configured").use_tls);
    }

    #[rstest]
    fn switches_can_be_turned_off() {
        let _guard = lock_env([
            ("ITAM_COOKIE_SECURE", Some("false".to_owned())),
            ("ITAM_MAIL_USE_TLS", Some("false".to_owned())),
            ("ITAM_SCHEDULER_ENABLED", Some("false".to_owned())),
            ("ITAM_MAIL_SERVER", Some("localhost".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.cookie_secure());
        assert!(!settings.scheduler_enabled());
        assert!(!settings.smtp_settings().expect("mail server configured").use_tls);
    }

    #[rstest]
    #[case(Some("   "), None)]
    #[case(None, None)]
    #[case(Some(" s3cret "), Some("s3cret"))]
    fn registration_code_ignores_blanks(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let mut settings = load_from_empty_args();
        settings.admin_registration_code = raw.map(str::to_owned);
        assert_eq!(settings.admin_registration_code().as_deref(), expected);
    }
}
