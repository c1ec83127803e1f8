// Two security tiers: public (no auth) and protected (JWT auth via middleware)
pub mod protected;
pub mod public;
