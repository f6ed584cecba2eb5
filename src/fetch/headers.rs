//! Browser header profiles for the HTTP tiers

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::utils::constants::{CHROME_SEC_CH_UA, CHROME_USER_AGENT};

/// Header set of one realistic consumer browser
#[derive(Debug, Clone, Copy)]
pub struct HeaderProfile {
    pub name: &'static str,
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    /// Browser-specific extras sent verbatim
    pub extra: &'static [(&'static str, &'static str)],
}

const DOCUMENT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Profiles tried in order by the plain-client tier
pub const PLAIN_PROFILES: &[HeaderProfile] = &[
    HeaderProfile {
        name: "chrome-windows",
        user_agent: CHROME_USER_AGENT,
        accept: DOCUMENT_ACCEPT,
        accept_language: "en-US,en;q=0.9",
        extra: &[("upgrade-insecure-requests", "1")],
    },
    HeaderProfile {
        name: "safari-macos",
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        accept_language: "en-GB,en;q=0.9",
        extra: &[],
    },
    HeaderProfile {
        name: "firefox-linux",
        user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
        accept: DOCUMENT_ACCEPT,
        accept_language: "en-US,en;q=0.5",
        extra: &[("upgrade-insecure-requests", "1"), ("dnt", "1")],
    },
];

/// Full Chromium navigation header set used by the challenge-aware tier
pub const CHALLENGE_PROFILE: HeaderProfile = HeaderProfile {
    name: "chromium-navigation",
    user_agent: CHROME_USER_AGENT,
    accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    accept_language: "en-US,en;q=0.9",
    extra: &[
        ("sec-ch-ua", CHROME_SEC_CH_UA),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
        ("upgrade-insecure-requests", "1"),
        ("cache-control", "max-age=0"),
    ],
};

impl HeaderProfile {
    /// Default headers for a client presenting this profile
    ///
    /// The user agent is set on the client builder, not here.
    #[must_use]
    pub fn header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(self.accept),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.accept_language),
        );
        for (name, value) in self.extra {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_distinct_plain_profiles() {
        assert_eq!(PLAIN_PROFILES.len(), 3);
        let agents: std::collections::HashSet<_> =
            PLAIN_PROFILES.iter().map(|p| p.user_agent).collect();
        assert_eq!(agents.len(), 3);
        for profile in PLAIN_PROFILES {
            // from_static panics on invalid input
            let headers = profile.header_map();
            assert!(headers.contains_key(reqwest::header::ACCEPT_LANGUAGE));
        }
    }

    #[test]
    fn challenge_profile_carries_client_hints() {
        let headers = CHALLENGE_PROFILE.header_map();
        assert_eq!(headers["sec-fetch-mode"], "navigate");
        assert!(headers["sec-ch-ua"].to_str().unwrap().contains("Chromium"));
    }
}
