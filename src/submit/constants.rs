//! Constants for the submit module (timeouts, endpoint paths, UI texts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes; rendering a long month can be slow).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Server used when neither the CLI nor the config file names one.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080/";

/// Fixed name of the downloaded document.
pub const ARTIFACT_FILENAME: &str = "Arbeitszeitdokumentation.pdf";

/// Endpoint path of the form pass-through variant (document root).
pub const FORM_ENDPOINT: &str = "/";

/// Endpoint path of the structured JSON variant, relative to the server base.
pub const STRUCTURED_ENDPOINT: &str = "tsg/";

/// Message shown while a submission is in flight.
pub const MSG_IN_PROGRESS: &str = "Generiere...";

/// Message shown once the document has been staged.
pub const MSG_SUCCESS: &str = "Generieren erfolgreich!";

/// Banner that prefixes every failure message.
pub const MSG_FAILURE_BANNER: &str = "Generieren fehlgeschlagen:";
