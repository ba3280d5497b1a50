//! Persistent stack of ignore rules active at each depth of a walk

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use super::rules::IgnoreRules;

#[derive(Debug)]
struct Frame {
    base: PathBuf,
    rules: Arc<IgnoreRules>,
    parent: FilterStack,
}

/// Immutable chain of ignore rules.
///
/// A path is allowed only if no frame in the chain excludes it. Each frame
/// interprets paths relative to the directory that defined its rules, so a
/// push can only narrow what is allowed: a deeper `!pattern` never
/// re-includes a path an ancestor excluded.
///
/// Cloning is cheap and shares frames.
#[derive(Debug, Clone, Default)]
pub struct FilterStack {
    top: Option<Arc<Frame>>,
}

impl FilterStack {
    /// An empty stack that allows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new stack with `rules` (defined in `base`) on top.
    pub fn push(&self, base: &Path, rules: Arc<IgnoreRules>) -> Self {
        Self {
            top: Some(Arc::new(Frame {
                base: base.to_path_buf(),
                rules,
                parent: self.clone(),
            })),
        }
    }

    /// Return the stack below the top frame.
    ///
    /// Popping an empty stack means pushes and pops were mismatched; it is
    /// logged and the stack is returned unchanged.
    pub fn pop(&self) -> Self {
        match &self.top {
            Some(frame) => frame.parent.clone(),
            None => {
                warn!("filter stack popped with no matching push");
                self.clone()
            }
        }
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    pub fn is_root(&self) -> bool {
        self.top.is_none()
    }

    /// Check whether `path` is allowed by every active frame.
    ///
    /// A path is also excluded when one of its parent directories (below a
    /// frame's base) is excluded by that frame.
    pub fn is_allowed(&self, path: &Path, is_dir: bool) -> bool {
        self.frames().all(|frame| {
            let Ok(relative) = path.strip_prefix(&frame.base) else {
                return true;
            };
            !relative
                .ancestors()
                .filter(|p| !p.as_os_str().is_empty())
                .enumerate()
                .any(|(i, p)| frame.rules.is_excluded(p, i > 0 || is_dir))
        })
    }

    /// Enter a directory, pushing its rules if it has any.
    ///
    /// The returned scope pops exactly what it pushed when dropped, so the
    /// stack is restored on every exit path out of the directory.
    pub fn enter(&mut self, base: &Path, rules: Option<Arc<IgnoreRules>>) -> DirScope<'_> {
        let pushed = match rules {
            Some(rules) => {
                *self = self.push(base, rules);
                true
            }
            None => false,
        };
        DirScope {
            stack: self,
            pushed,
        }
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::successors(self.top.as_deref(), |frame| frame.parent.top.as_deref())
    }
}

/// Guard for one directory's frame; see [`FilterStack::enter`].
#[derive(Debug)]
pub struct DirScope<'a> {
    stack: &'a mut FilterStack,
    pushed: bool,
}

impl DirScope<'_> {
    /// Whether entering the directory pushed a frame.
    pub fn pushed(&self) -> bool {
        self.pushed
    }
}

impl Deref for DirScope<'_> {
    type Target = FilterStack;

    fn deref(&self) -> &FilterStack {
        self.stack
    }
}

impl DerefMut for DirScope<'_> {
    fn deref_mut(&mut self) -> &mut FilterStack {
        self.stack
    }
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        if self.pushed {
            *self.stack = self.stack.pop();
        }
    }
}
