/*!
 * # Editing Core
 *
 * Turns a fetched [`DocumentSnapshot`](crate::DocumentSnapshot) into the
 * ordered batch of native-index mutations that realizes a caller's intent.
 *
 * ## Pipeline
 *
 * 1. **Linearize** (`linearize`): concatenate paragraph run text into a flat
 *    string, remembering where each run sits in native index space. Opaque
 *    elements consume native indices without contributing text.
 * 2. **Resolve** (`resolve`): find a literal needle in the flat text and map
 *    its flat bounds back to a native half-open range.
 * 3. **Style** (`style`): turn a sparse [`StyleRequest`] into a payload plus
 *    the list of fields declared as changed.
 * 4. **Plan** (`plan`): build the [`Batch`] of [`EditOperation`]s.
 *
 * ## Index discipline
 *
 * Native indices are 1-based UTF-16 code units. Every range in a batch is
 * computed from the single pre-batch snapshot; nothing is recomputed from a
 * partially edited document. The final unit of a body is structural and is
 * never deleted.
 *
 * ```rust
 * use gdocs_editor_engine::editing::*;
 * use gdocs_editor_engine::DocumentSnapshot;
 *
 * let snapshot = DocumentSnapshot::from_plain_text("Notes", "Hello World\n");
 * let flat = linearize(&snapshot);
 * assert_eq!(flat.end_index(), 13);
 *
 * let batch = plan(&flat, &EditIntent::Append("Bye".to_string())).unwrap();
 * assert_eq!(
 *     batch.operations(),
 *     &[EditOperation::InsertText { at: 12, text: "\nBye".to_string() }]
 * );
 * ```
 */

pub mod linearize;
pub mod plan;
pub mod resolve;
pub mod style;

pub use linearize::{FlatText, linearize};
pub use plan::{
    Batch, EditIntent, EditOperation, PlanError, plan, plan_append, plan_replace_all,
    plan_restyle,
};
pub use resolve::find_range;
pub use style::{StyleField, StyleRequest, StyleUpdate, TextStyle, build_style};
