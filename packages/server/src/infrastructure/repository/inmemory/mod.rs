pub mod pairing;

pub use pairing::InMemoryPairingRepository;
