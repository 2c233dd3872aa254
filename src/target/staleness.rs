// src/target/staleness.rs

//! Modification-time based staleness.
//!
//! An output is stale when:
//! 1. it does not exist, or
//! 2. a dependency produced by a registered target is itself stale, or
//! 3. a dependency does not exist, or
//! 4. a dependency was modified after the output.
//!
//! Nothing is memoized; every call walks the registered dependencies again.

use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::target::TargetMap;

impl TargetMap {
    /// Whether `output` has to be (re)built.
    ///
    /// An output no target produces is stale only if it is missing. A
    /// dependency cycle met on the way counts as stale, so that the leveling
    /// pass of a build gets to report it.
    pub fn needs_rebuild(&self, output: &str) -> bool {
        let mut path = Vec::new();
        self.is_stale(output, &mut path)
    }

    fn is_stale<'a>(&'a self, output: &'a str, path: &mut Vec<&'a str>) -> bool {
        let Some(output_time) = self.fs.modified(Path::new(output)) else {
            debug!(output, "output missing; needs rebuild");
            return true;
        };

        let Some(target) = self.targets.get(output) else {
            return false;
        };

        if path.contains(&output) {
            debug!(output, "dependency cycle while checking staleness");
            return true;
        }

        path.push(output);
        let stale = target
            .dependencies()
            .iter()
            .any(|dep| self.dependency_is_stale(output, dep, output_time, path));
        path.pop();

        stale
    }

    fn dependency_is_stale<'a>(
        &'a self,
        output: &str,
        dep: &'a str,
        output_time: SystemTime,
        path: &mut Vec<&'a str>,
    ) -> bool {
        if self.targets.contains_key(dep) && self.is_stale(dep, path) {
            debug!(output, dep, "dependency needs rebuild");
            return true;
        }

        match self.fs.modified(Path::new(dep)) {
            None => {
                debug!(output, dep, "dependency missing");
                true
            }
            Some(dep_time) if dep_time > output_time => {
                debug!(output, dep, "dependency is newer than output");
                true
            }
            Some(_) => false,
        }
    }
}
