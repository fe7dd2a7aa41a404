use hir::TyId;
use utility::{Atom, HashMap};

/// A stack of lexical scope frames mapping names to types.
///
/// Frames are pushed on entry to a block or instantiation and popped on
/// exit, strictly paired. Lookup walks the frames from innermost to
/// outermost. Instantiations swap the whole stack out so that they never
/// observe the scopes of the code that demanded them.
#[derive(Default)]
pub(crate) struct ScopeStack {
    frames: Vec<HashMap<Atom, TyId>>,
}

impl ScopeStack {
    pub(crate) fn push_frame(&mut self) {
        self.frames.push(HashMap::default());
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Bind a name in the innermost frame.
    pub(crate) fn insert(&mut self, name: Atom, ty: TyId) {
        self.frames.last_mut().unwrap().insert(name, ty);
    }

    pub(crate) fn look_up(&self, name: Atom) -> Option<TyId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).copied())
    }
}
