// -
// Wire protocol separators

/// Joins the fields of one probe entry in a `Probe-Modify-Request` payload.
pub(crate) const WORD_SEPARATOR: char = '\u{2}';

/// Terminates one probe entry in a `Probe-Modify-Request` payload.
pub(crate) const LINE_SEPARATOR: char = '\u{1}';

// -
// Service paths

pub(crate) const CONFIG_PATH: &str = "/diamond-server/config.co";
pub(crate) const BASESTONE_PATH: &str = "/diamond-server/basestone.do";
pub(crate) const DATUM_PATH: &str = "/diamond-server/datum.do";
pub(crate) const ADMIN_PATH: &str = "/diamond-server/admin.do";
pub(crate) const UNIT_LIST_PATH: &str = "/diamond-server/unit-list";
pub(crate) const ENV_PATH: &str = "/env";

/// Discovery path for the default unit; per-unit lists live under
/// `/diamond-server/diamond-unit-{unit}`.
pub(crate) const DEFAULT_UNIT_SERVER_PATH: &str = "/diamond-server/diamond";

/// The discovery endpoint listens on a fixed port.
pub(crate) const DISCOVERY_PORT: u16 = 8080;

// -
// Headers

pub(crate) const HEADER_ACCESS_KEY: &str = "spas-accesskey";
pub(crate) const HEADER_SIGNATURE: &str = "spas-signature";
pub(crate) const HEADER_TIMESTAMP: &str = "timestamp";
pub(crate) const HEADER_LONGPOLL_TIMEOUT: &str = "longpullingtimeout";
pub(crate) const HEADER_EXCONFIGINFO: &str = "exconfiginfo";
pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=GBK";

// -
// Timeouts and defaults (milliseconds unless noted)

pub(crate) const DISCOVERY_TIMEOUT_MS: u64 = 3_000;
pub(crate) const REQUEST_TIMEOUT_MS: u64 = 10_000;
pub(crate) const DEFAULT_LONGPOLL_TIMEOUT_MS: u64 = 30_000;

/// The long-poll HTTP call must outlive the server-side hold window.
pub(crate) const LONGPOLL_REQUEST_TIMEOUT_MS: u64 = 40_000;

/// Pause between poll-loop iterations after a failed probe or refetch.
pub(crate) const POLL_ERROR_BACKOFF_MS: u64 = 1_000;

/// Page size used when listing a whole tenant.
pub(crate) const TENANT_PAGE_SIZE: u32 = 200;

/// Unit name used when the caller does not pin one.
pub(crate) const CURRENT_UNIT: &str = "CURRENT_UNIT";
