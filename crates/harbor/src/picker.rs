use std::path::PathBuf;

use futures::FutureExt;
use futures::future::BoxFuture;
use harbor_core::DirectoryPicker;
use tracing::debug;

/// Native folder chooser.
pub struct RfdPicker {
    title: String,
}

impl RfdPicker {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl DirectoryPicker for RfdPicker {
    fn pick_directory(&self) -> BoxFuture<'static, Option<PathBuf>> {
        let dialog = rfd::AsyncFileDialog::new().set_title(self.title.as_str());
        async move {
            debug!(event = "host.dialog.folder_opened");
            dialog
                .pick_folder()
                .await
                .map(|handle| handle.path().to_path_buf())
        }
        .boxed()
    }
}
