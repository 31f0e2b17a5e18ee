/// Simulated annealing layout search
pub mod annealing;
/// Energy model and its penalty terms
pub mod energy;
