#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards runner phase events to an optional front-end callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `f` between a `PhaseStart` and a `PhaseFinish` event.
    ///
    /// `PhaseFinish` is only reported when `f` succeeds.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let value = f()?;
        self.report(Progress::PhaseFinish);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn phase_reports_start_and_finish_on_success() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| {
            events.lock().unwrap().push(format!("{:?}", e));
        }));

        let value: Result<u32, ()> = reporter.phase("Embedding", || Ok(7));
        assert_eq!(value, Ok(7));
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "PhaseStart { name: \"Embedding\" }".to_string(),
                "PhaseFinish".to_string()
            ]
        );
    }

    #[test]
    fn phase_skips_finish_on_failure() {
        let events = Mutex::new(0usize);
        let reporter = ProgressReporter::with_callback(Box::new(|e| {
            if matches!(e, Progress::PhaseFinish) {
                *events.lock().unwrap() += 1;
            }
        }));

        let result: Result<(), &str> = reporter.phase("Docking", || Err("boom"));
        assert_eq!(result, Err("boom"));
        drop(reporter);
        assert_eq!(events.into_inner().unwrap(), 0);
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
    }
}
