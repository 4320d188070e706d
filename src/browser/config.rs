use std::path::PathBuf;
use std::time::Duration;

/// Options for launching a new Chrome/Chromium instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,

    pub window_width: u32,
    pub window_height: u32,

    /// Chrome binary to use instead of the auto-detected one
    pub chrome_path: Option<PathBuf>,

    /// Profile directory; a temporary one is used when absent
    pub user_data_dir: Option<PathBuf>,

    /// Enable the Chrome sandbox (default: true)
    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

/// Options for attaching to an already running browser
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// DevTools WebSocket URL, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`
    pub ws_url: String,

    /// Idle timeout of the connection in milliseconds
    pub timeout: u64,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            ws_url: "ws://127.0.0.1:9222".to_string(),
            timeout: 30_000,
        }
    }
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }
}

/// Timing used by a live page when performing actions
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Upper bound for a click-triggered navigation to finish loading
    pub navigation_timeout: Duration,

    /// Pause after a click before checking whether the document was replaced
    pub settle_delay: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(300),
        }
    }
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}
