use core::fmt;

use hermit_sync::SpinMutex;

use crate::IOutput;

/// Collects output lines per stream.
#[derive(Default)]
pub(crate) struct Lines {
    pub out: SpinMutex<Vec<String>>,
    pub err: SpinMutex<Vec<String>>,
}

impl IOutput for Lines {
    fn stdout(&self, line: fmt::Arguments<'_>) {
        self.out.lock().push(line.to_string());
    }

    fn stderr(&self, line: fmt::Arguments<'_>) {
        self.err.lock().push(line.to_string());
    }
}
