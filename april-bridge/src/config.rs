//! Bridge configuration.

/// Configuration for the bridge and the engine session it starts.
///
/// # Examples
///
/// ```
/// use april_bridge::BridgeConfig;
///
/// let config = BridgeConfig::default()
///     .with_data_path("/data/user/0/com.example.game/files")
///     .with_package_path("/data/app/com.example.game/base.apk");
/// assert_eq!(config.launch_args()[0], "/data/app/com.example.game/base.apk");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Writable data directory handed to the engine. Defaults to `"."`.
    pub data_path: String,
    /// Forced archive path, empty to let the engine decide.
    pub archive_path: String,
    /// Path of the host package, passed as `argv[0]`.
    pub package_path: String,
    /// Arguments appended after `argv[0]`.
    pub extra_args: Vec<String>,
    /// Share of the root view the keyboard must cover to count as visible.
    pub keyboard_visible_threshold: f32,
    /// Name given to the render thread.
    pub render_thread_name: String,
    /// Run the render thread at the lowest scheduling priority.
    pub demote_render_thread: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            data_path: ".".to_string(),
            archive_path: String::new(),
            package_path: String::new(),
            extra_args: Vec::new(),
            keyboard_visible_threshold: 0.15,
            render_thread_name: "april-render".to_string(),
            demote_render_thread: true,
        }
    }
}

impl BridgeConfig {
    /// Sets the data directory.
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Sets the forced archive path.
    pub fn with_archive_path(mut self, path: impl Into<String>) -> Self {
        self.archive_path = path.into();
        self
    }

    /// Sets the host package path.
    pub fn with_package_path(mut self, path: impl Into<String>) -> Self {
        self.package_path = path.into();
        self
    }

    /// Appends a launch argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Sets the keyboard visibility threshold.
    pub fn with_keyboard_visible_threshold(mut self, threshold: f32) -> Self {
        self.keyboard_visible_threshold = threshold;
        self
    }

    /// Sets the render thread name.
    pub fn with_render_thread_name(mut self, name: impl Into<String>) -> Self {
        self.render_thread_name = name.into();
        self
    }

    /// Enables or disables render thread demotion.
    pub fn with_demoted_render_thread(mut self, demote: bool) -> Self {
        self.demote_render_thread = demote;
        self
    }

    /// Arguments for `Engine::init`, package path first.
    pub fn launch_args(&self) -> Vec<String> {
        std::iter::once(self.package_path.clone())
            .chain(self.extra_args.iter().cloned())
            .collect()
    }
}
