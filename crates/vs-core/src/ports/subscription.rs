use std::fmt;

type Remover = Box<dyn FnOnce() + Send>;

/// Removal handle for a listener registered with a platform service.
///
/// 平台服务监听器的移除句柄。
///
/// The removal closure runs exactly once: on [`Subscription::remove`] or, if
/// that was never called, when the handle is dropped.
pub struct Subscription {
    label: &'static str,
    remover: Option<Remover>,
}

impl Subscription {
    pub fn new(label: &'static str, remover: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label,
            remover: Some(Box::new(remover)),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn remove(mut self) {
        self.run_remover();
    }

    fn run_remover(&mut self) {
        if let Some(remover) = self.remover.take() {
            remover();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_remover();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("live", &self.remover.is_some())
            .finish()
    }
}
