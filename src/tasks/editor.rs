//! Task: resolve the editor exported by the shell profile.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::editor::resolve_editor;

/// Pick (or install) the editor exported as `EDITOR`.
#[derive(Debug)]
pub struct ResolveEditor;

impl Task for ResolveEditor {
    fn name(&self) -> &'static str {
        "Resolve editor"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let editor = resolve_editor(ctx)?;
        ctx.log.info(&format!("editor: {editor}"));
        if ctx.editor.set(editor).is_err() {
            ctx.log.debug("editor already resolved in this run");
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::editor::EditorCommand;
    use crate::platform::Os;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;
    use std::sync::Arc;

    #[test]
    fn stores_resolved_editor_in_context() {
        let (mut ctx, _log) = make_context(Os::MacOs);
        ctx.executor = Arc::new(MockExecutor::default().with_available(&["subl"]));

        ResolveEditor.run(&ctx).unwrap();
        assert_eq!(ctx.editor.get(), Some(&EditorCommand::Sublime));
    }

    #[test]
    fn failure_leaves_editor_unset() {
        let (ctx, _log) = make_context(Os::MacOs);
        assert!(ResolveEditor.run(&ctx).is_err());
        assert!(ctx.editor.get().is_none());
    }
}
