use std::fmt::{self, Debug, Write};

use super::RangeTree;

impl<T: Debug> RangeTree<T> {
    /// Indented dump of the tree, one range per line: `[start, end) tag`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_outline(&mut out);
        out
    }

    fn write_outline(&self, out: &mut impl Write) -> fmt::Result {
        let mut pending: Vec<_> = self
            .children(self.root())
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();
        while let Some((id, depth)) = pending.pop() {
            if let Some(range) = self.value(id) {
                writeln!(
                    out,
                    "{:indent$}[{}, {}) {:?}",
                    "",
                    range.start(),
                    range.end(),
                    range.tag(),
                    indent = depth * 2
                )?;
            }
            let depth = depth + 1;
            pending.extend(self.children(id).iter().rev().map(|&child| (child, depth)));
        }
        Ok(())
    }
}
