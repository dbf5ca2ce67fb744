use crate::graph::{Described, FieldValue};

/// Receiver for tree rows. The walker drives one of these per frame; the
/// egui grid is one implementation, test recorders another.
pub trait TreeSink {
    /// A row whose value has named sub-fields. Returning `true` asks the
    /// walker to descend into it before `close_composite` is called.
    fn composite_row(&mut self, depth: usize, name: &str, type_name: &str) -> bool;
    fn close_composite(&mut self);
    fn leaf_row(&mut self, depth: usize, name: &str, type_name: &str, value: &str);
}

/// Emits one row per field of `node` in declared order, recursing into
/// composite fields while the sink keeps them expanded. The walker holds no
/// state of its own; expansion lives in the sink. Property trees coming out
/// of the decoder are finite, so no depth guard is applied here.
pub fn walk(node: &dyn Described, sink: &mut dyn TreeSink) {
    walk_at(node, 0, sink);
}

fn walk_at(node: &dyn Described, depth: usize, sink: &mut dyn TreeSink) {
    for (name, value) in node.fields() {
        match value {
            FieldValue::Composite(child) => {
                if sink.composite_row(depth, name, child.type_name()) {
                    walk_at(child, depth + 1, sink);
                }
                sink.close_composite();
            }
            FieldValue::Leaf { type_name, text } => {
                sink.leaf_row(depth, name, type_name, &text);
            }
        }
    }
}
