//! Rendering of help topics

use super::{ConditionEvaluator, ContentSource, HelpEntry, HelpError, HelpRegistry};
use rustserv_core::{Config, LoadedModules, OutputSink, PrivilegeTable, SourceInfo};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Replaced by the service's display name in help text
pub const NICK_TOKEN: &str = "&nick&";

const IF_DIRECTIVE: &str = "#if";
const ENDIF_DIRECTIVE: &str = "#endif";

/// Relative prefix of NickServ help files
const NICKSERV_HELP_DIR: &str = "help/nickserv/";
/// Where NickServ help lives when nicknames are not owned by accounts
const USERSERV_HELP_DIR: &str = "help/userserv/";

/// `#if` nesting while streaming one document
#[derive(Debug, Default)]
struct RenderState {
    if_depth: usize,
    false_depth: usize,
}

impl RenderState {
    /// Enter an `#if` block. The condition is only evaluated when the
    /// enclosing block is shown.
    fn enter_if(&mut self, holds: impl FnOnce() -> bool) {
        if self.false_depth > 0 || !holds() {
            self.false_depth += 1;
        }
        self.if_depth += 1;
    }

    /// Leave an `#if` block; a stray `#endif` is ignored.
    fn leave_if(&mut self) {
        self.false_depth = self.false_depth.saturating_sub(1);
        self.if_depth = self.if_depth.saturating_sub(1);
    }

    fn suppressed(&self) -> bool {
        self.false_depth > 0
    }
}

/// Renders help entries to an output sink
#[derive(Clone)]
pub struct HelpRenderer {
    evaluator: ConditionEvaluator,
    share_dir: PathBuf,
    no_nick_ownership: bool,
}

impl HelpRenderer {
    pub fn new(evaluator: ConditionEvaluator, share_dir: impl Into<PathBuf>) -> Self {
        Self {
            evaluator,
            share_dir: share_dir.into(),
            no_nick_ownership: false,
        }
    }

    /// Serve NickServ help from the UserServ tree
    pub fn with_no_nick_ownership(mut self, enabled: bool) -> Self {
        self.no_nick_ownership = enabled;
        self
    }

    /// Build a renderer from the `[paths]`, `[protocol]`, `[auth]`,
    /// `[nickserv]`, `[modules]` and operator sections
    pub fn from_config(config: &Config) -> Self {
        let modules: LoadedModules = config.modules.loaded.iter().collect();
        let evaluator = ConditionEvaluator::new(
            config.features(),
            Arc::new(PrivilegeTable::from_config(config)),
            Arc::new(modules),
        );

        Self::new(evaluator, &config.paths.share_dir)
            .with_no_nick_ownership(config.nickserv.no_nick_ownership)
    }

    pub fn evaluator(&self) -> &ConditionEvaluator {
        &self.evaluator
    }

    pub fn share_dir(&self) -> &Path {
        &self.share_dir
    }

    /// Resolve a help file path against the share directory
    pub fn resolve_path(&self, file: &str) -> PathBuf {
        if Path::new(file).is_absolute() {
            return PathBuf::from(file);
        }

        if self.no_nick_ownership {
            if let Some(rest) = file.strip_prefix(NICKSERV_HELP_DIR) {
                return self.share_dir.join(USERSERV_HELP_DIR).join(rest);
            }
        }

        self.share_dir.join(file)
    }

    /// Look up `topic` and render it, reporting failures to the actor
    pub fn display(
        &self,
        registry: &HelpRegistry,
        si: &SourceInfo<'_>,
        topic: &str,
        sink: &mut dyn OutputSink,
    ) {
        let result = registry
            .resolve(topic)
            .and_then(|entry| self.render(si, entry, sink));

        if let Err(e) = result {
            debug!("Help for {} requested by {} failed: {:?}", topic, si.actor.nick, e);
            sink.fail(e.fault(), &e.to_string());
        }
    }

    /// Render a resolved entry between the help banners.
    ///
    /// If the help file cannot be opened nothing is written and
    /// [`HelpError::SourceUnavailable`] is returned.
    pub fn render(
        &self,
        si: &SourceInfo<'_>,
        entry: &HelpEntry,
        sink: &mut dyn OutputSink,
    ) -> Result<(), HelpError> {
        match entry.source() {
            ContentSource::File(file) => {
                let path = self.resolve_path(file);
                let reader = File::open(&path)
                    .map(BufReader::new)
                    .map_err(|source| {
                        warn!("Could not open help file {}: {}", path.display(), source);
                        HelpError::SourceUnavailable {
                            topic: entry.name().to_string(),
                            path: path.clone(),
                            source,
                        }
                    })?;

                header(si, sink);
                self.render_document(si, reader, sink);
                footer(sink);
            }
            ContentSource::Handler(handler) => {
                header(si, sink);
                handler.render_help(si, sink);
                footer(sink);
            }
        }

        Ok(())
    }

    /// Stream a help document, interpreting `#if`/`#endif` and substituting
    /// [`NICK_TOKEN`]. Banners are not written.
    pub fn render_document<R: BufRead>(
        &self,
        si: &SourceInfo<'_>,
        mut reader: R,
        sink: &mut dyn OutputSink,
    ) {
        let mut state = RenderState::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Error reading help document: {}", e);
                    break;
                }
            }

            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end();

            if let Some(condition) = line.strip_prefix(IF_DIRECTIVE) {
                state.enter_if(|| self.evaluator.evaluate(si.actor, condition));
                continue;
            }
            if line.starts_with(ENDIF_DIRECTIVE) {
                state.leave_if();
                continue;
            }
            if state.suppressed() {
                continue;
            }

            if line.is_empty() {
                sink.success(" ");
            } else {
                sink.success(&line.replace(NICK_TOKEN, &si.service.disp));
            }
        }

        if state.if_depth > 0 {
            debug!("Help document ended with {} unclosed #if", state.if_depth);
        }
    }
}

fn header(si: &SourceInfo<'_>, sink: &mut dyn OutputSink) {
    sink.success(&format!("***** \x02{} Help\x02 *****", si.service.nick));
}

fn footer(sink: &mut dyn OutputSink) {
    sink.success("***** \x02End of Help\x02 *****");
}
