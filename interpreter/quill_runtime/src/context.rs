//! The execution-context stack.
//!
//! A context is the `(self, sender, message, each)` binding active during a
//! method execution. Entering a scoped binding copies the current top,
//! overwrites exactly one field, and pushes; leaving pops unconditionally.
//! The guard holds `&mut Universe` and pops in `Drop`, so the pop runs on
//! every exit path - early returns, `?`-propagated halts, and unwinding
//! alike. The sentinel context pushed at startup is never popped.

use crate::Universe;
use quill_ir::{ObjectId, Word};
use std::ops::{Deref, DerefMut};

/// One `(self, sender, message, each)` binding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Context {
    /// The object receiving the current message.
    pub self_object: ObjectId,
    /// The object that sent the current message.
    pub sender: ObjectId,
    /// The message being handled, if any.
    pub message: Option<Word>,
    /// The current element of an iteration, if any.
    pub each: Option<ObjectId>,
}

/// RAII guard for one pushed context.
///
/// Access the universe through the guard - it implements `Deref` and
/// `DerefMut`. Dropping the guard pops the context, unwinding included.
pub struct ContextGuard<'guard> {
    universe: &'guard mut Universe,
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.universe.pop_context();
    }
}

impl Deref for ContextGuard<'_> {
    type Target = Universe;

    fn deref(&self) -> &Self::Target {
        self.universe
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.universe
    }
}

impl Universe {
    /// The binding at the top of the stack.
    pub fn current_context(&self) -> &Context {
        match self.contexts.last() {
            Some(context) => context,
            None => unreachable!("the context stack always holds the sentinel"),
        }
    }

    pub fn current_context_mut(&mut self) -> &mut Context {
        match self.contexts.last_mut() {
            Some(context) => context,
            None => unreachable!("the context stack always holds the sentinel"),
        }
    }

    /// Current nesting depth (1 = only the sentinel).
    pub fn context_depth(&self) -> usize {
        self.contexts.len()
    }

    pub(crate) fn pop_context(&mut self) {
        debug_assert!(
            self.contexts.len() > 1,
            "the sentinel context must never be popped"
        );
        if self.contexts.len() > 1 {
            self.contexts.pop();
        }
    }

    fn scoped(&mut self, context: Context) -> ContextGuard<'_> {
        self.contexts.push(context);
        ContextGuard { universe: self }
    }

    /// Enter a scope with a new `self` binding.
    pub fn with_self(&mut self, object: ObjectId) -> ContextGuard<'_> {
        let mut context = self.current_context().clone();
        context.self_object = object;
        self.scoped(context)
    }

    /// Enter a scope with a new `message` binding.
    pub fn with_message(&mut self, message: Word) -> ContextGuard<'_> {
        let mut context = self.current_context().clone();
        context.message = Some(message);
        self.scoped(context)
    }

    /// Enter a scope with a new `each` binding.
    pub fn with_each(&mut self, each: ObjectId) -> ContextGuard<'_> {
        let mut context = self.current_context().clone();
        context.each = Some(each);
        self.scoped(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nesting_restores_the_exact_prior_context() {
        let mut universe = Universe::new();
        let before = universe.current_context().clone();
        let depth = universe.context_depth();
        let lamp = universe.define_new_object(None);

        {
            let mut outer = universe.with_self(lamp);
            assert_eq!(outer.current_context().self_object, lamp);
            {
                let word = outer.definitions_mut().vocabulary.intern("rub");
                let inner = outer.with_message(word);
                assert_eq!(inner.current_context().message, Some(word));
                assert_eq!(inner.current_context().self_object, lamp);
            }
            assert_eq!(outer.current_context().message, before.message);
        }

        assert_eq!(universe.context_depth(), depth);
        assert_eq!(*universe.current_context(), before);
    }

    #[test]
    fn guard_pops_on_early_exit() {
        fn bails(universe: &mut Universe) -> Result<(), ()> {
            let lamp = universe.define_new_object(None);
            let _scope = universe.with_each(lamp);
            Err(())
        }

        let mut universe = Universe::new();
        let depth = universe.context_depth();
        assert_eq!(bails(&mut universe), Err(()));
        assert_eq!(universe.context_depth(), depth);
    }

    #[test]
    fn each_binding_overwrites_only_each() {
        let mut universe = Universe::new();
        let before = universe.current_context().clone();
        let token = universe.define_new_object(None);
        let scope = universe.with_each(token);
        assert_eq!(scope.current_context().each, Some(token));
        assert_eq!(scope.current_context().self_object, before.self_object);
        assert_eq!(scope.current_context().sender, before.sender);
    }
}
