pub mod active_information;
pub mod approaches;
pub mod mutual_information;
pub mod significance;
pub mod traits;
pub mod transfer_entropy;
pub mod utils;

pub use active_information::{
    ActiveInformation, active_information, active_information_with_rng,
    active_information_with_significance,
};
pub use mutual_information::{
    MutualInformation, mutual_information, mutual_information_with_rng,
    mutual_information_with_significance,
};
pub use significance::{Significance, SignificantValue, permutation_test};
pub use traits::{GlobalValue, LocalValues, Surrogate};
pub use transfer_entropy::{
    TransferEntropy, transfer_entropy, transfer_entropy_with_rng,
    transfer_entropy_with_significance,
};
