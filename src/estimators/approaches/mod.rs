pub mod discrete;

pub use discrete::mle::DiscreteEntropy;
pub use discrete::{
    DiscreteActiveInformation, DiscreteConditionalMutualInformation, DiscreteMutualInformation,
    DiscreteTransferEntropy,
};
