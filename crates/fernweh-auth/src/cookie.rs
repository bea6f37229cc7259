//! Session cookie pair.
//!
//! Both cookies are HttpOnly with a fixed max-age. Development uses
//! `SameSite=Lax` without `Secure` so plain-HTTP localhost works; any
//! other deployment gets `SameSite=None; Secure` for the cross-origin
//! frontend.

use time::Duration;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSite,
    pub access_max_age: Duration,
    pub refresh_max_age: Duration,
}

impl CookieConfig {
    #[must_use]
    pub fn new(production: bool, access_max_age: Duration, refresh_max_age: Duration) -> Self {
        Self {
            secure: production,
            same_site: if production {
                SameSite::None
            } else {
                SameSite::Lax
            },
            access_max_age,
            refresh_max_age,
        }
    }

    /// `Set-Cookie` value carrying a fresh access token.
    #[must_use]
    pub fn access_cookie(&self, token: &str) -> String {
        self.build_cookie(ACCESS_COOKIE, token, self.access_max_age)
    }

    /// `Set-Cookie` value carrying a fresh refresh token.
    #[must_use]
    pub fn refresh_cookie(&self, token: &str) -> String {
        self.build_cookie(REFRESH_COOKIE, token, self.refresh_max_age)
    }

    fn build_cookie(&self, name: &str, value: &str, max_age: Duration) -> String {
        let mut cookie = format!(
            "{name}={value}; Max-Age={}; Path=/; HttpOnly; SameSite={}",
            max_age.whole_seconds(),
            self.same_site.as_str()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that expires the named cookie immediately.
    #[must_use]
    pub fn clear_cookie(&self, name: &str) -> String {
        self.build_cookie(name, "", Duration::ZERO)
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self::new(false, Duration::minutes(15), Duration::days(7))
    }
}
