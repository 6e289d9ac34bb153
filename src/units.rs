//! The intermediate representation: parser units and their queue.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitKind {
    /// Stack bottom, corresponding to the start of the document.
    Null,
    Item,
    Paragraph,
    BlockQuote,
    CodeBlock,
    Rule,
    Heading,
    HtmlBlock,
    OrderedList,
    BulletList,
    Table,
    TableHead,
    TableBody,
    TableRow,
    HeadCell,
    DataCell,
    Link,
    Image,
    CodeSpan,
    RawHtml,
    /// Brackets a deferred argument value.
    Arg,
    /// Brackets rich inline content collected into one argument.
    ArgInlines,
    /// Catch-all container for inline text between structural units.
    Inlines,
    /// Tombstone: the unit is dead weight, kept so indices stay valid.
    Junk,
}

impl UnitKind {
    pub(crate) fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

#[derive(Debug)]
pub(crate) struct Unit {
    pub kind: UnitKind,
    pub open: bool,
    pub close: bool,
    pub text: Option<String>,
    /// Deferred values merged down from argument brackets.
    pub args: Option<Vec<Option<String>>>,
}

impl Unit {
    pub(crate) fn append_text(&mut self, s: &str) {
        self.text.get_or_insert_with(String::new).push_str(s)
    }

    /// The argument at `index`, when present and non-null.
    pub(crate) fn arg(&self, index: usize) -> Option<&str> {
        self.args.as_ref()?.get(index)?.as_deref()
    }

    pub(crate) fn arg_count(&self) -> usize {
        self.args.as_ref().map_or(0, Vec::len)
    }

    /// Whether the unit's last argument (or its text) ends with `c`.
    fn ends_with(&self, c: char) -> bool {
        match &self.args {
            Some(args) => args
                .last()
                .and_then(|a| a.as_deref())
                .is_some_and(|a| a.ends_with(c)),
            None => self.text.as_deref().is_some_and(|t| t.ends_with(c)),
        }
    }

    /// Rewrites the unit to junk.  Units are never removed mid-pipeline so
    /// that indices held by other passes stay valid.
    pub(crate) fn consume(&mut self) {
        self.kind = UnitKind::Junk;
    }
}

/// The unit queue, in document order.  The most recent unit is the top.
#[derive(Default)]
pub(crate) struct UnitQueue {
    units: Vec<Unit>,
    /// Bit set of every kind pushed, junk rewrites notwithstanding.
    pub seen: u32,
}

impl UnitQueue {
    pub(crate) fn push(&mut self, kind: UnitKind, open: bool, close: bool, with_args: bool) {
        self.seen |= kind.bit();
        self.units.push(Unit {
            kind,
            open,
            close,
            text: None,
            args: if with_args { Some(Vec::new()) } else { None },
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn top(&mut self) -> &mut Unit {
        self.units.last_mut().expect("unit queue is never empty")
    }

    pub(crate) fn pop(&mut self) -> Unit {
        self.units.pop().expect("unit queue is never empty")
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.units.truncate(len)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }

    /// Whether the top unit matches one of `kinds` with the given role.
    pub(crate) fn top_is(&self, kinds: &[UnitKind], open: bool, close: bool) -> bool {
        self.nth_from_top_is(0, kinds, open, close)
    }

    /// Ditto for the unit right below the top.
    pub(crate) fn below_top_is(&self, kinds: &[UnitKind], open: bool, close: bool) -> bool {
        self.nth_from_top_is(1, kinds, open, close)
    }

    fn nth_from_top_is(&self, n: usize, kinds: &[UnitKind], open: bool, close: bool) -> bool {
        if self.units.len() <= n {
            return false;
        }
        let unit = &self.units[self.units.len() - 1 - n];
        kinds.contains(&unit.kind) && (!open || unit.open) && (!close || unit.close)
    }

    pub(crate) fn top_ends_line(&self) -> bool {
        self.units
            .last()
            .is_some_and(|u| u.ends_with('\n'))
    }
}

impl Index<usize> for UnitQueue {
    type Output = Unit;

    fn index(&self, index: usize) -> &Unit {
        &self.units[index]
    }
}

impl IndexMut<usize> for UnitQueue {
    fn index_mut(&mut self, index: usize) -> &mut Unit {
        &mut self.units[index]
    }
}
