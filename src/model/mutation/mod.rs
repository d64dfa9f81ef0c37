mod batch;
mod mutation;
mod precondition;
mod result;
mod squash;
mod transform;

pub use batch::{MutationBatch, MutationBatchResult};
pub use mutation::{Mutation, MutationKind, TouchedFields};
pub use precondition::Precondition;
pub use result::MutationResult;
pub use squash::{calculate_overlay_mutation, squash, MutationSquasher};
pub use transform::{FieldTransform, NumericOperand, TransformOperation};
