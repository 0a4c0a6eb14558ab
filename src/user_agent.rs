//! User-Agent string for requests to the generator server.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/Garmelon/Arbeitszeitdokumentationsgenerator";

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("abzdok/{version} (+{PROJECT_UA_URL})")
}
