//! Stellarcade Random Generator Contract
//!
//! Serves bounded draws to whitelisted game contracts. A caller asks for a
//! value in `[0, range)` and receives it in the same invocation, so a game can
//! obtain randomness and apply it inside one atomic transaction.
//!
//! Values come from the host PRNG (`env.prng()`), which is seeded per
//! invocation by the network. The contract does not claim more than that:
//! games that need a commit/reveal scheme should wrap a different source
//! behind the same `draw` entry point.
//!
//! ## Storage Strategy
//! - `instance()`: Admin, DrawCount. Fixed contract-level config and a counter.
//! - `persistent()`: AuthorizedCaller entries, each a separate ledger entry
//!   with TTL bumped on every write.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::{contract, contracterror, contractevent, contractimpl, contracttype, Address, Env};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized     = 2,
    NotAuthorized      = 3,
    /// `range == 0`: there is no value to draw.
    InvalidBound       = 4,
    /// The `caller` passed to `draw` is not in the whitelist.
    UnauthorizedCaller = 5,
}

// ---------------------------------------------------------------------------
// Storage Types
// ---------------------------------------------------------------------------

#[contracttype]
pub enum DataKey {
    // --- instance() ---
    Admin,
    /// Number of draws served so far.
    DrawCount,
    // --- persistent() ---
    /// Presence flag for whitelisted game contract addresses.
    AuthorizedCaller(Address),
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct RandomDrawn {
    #[topic]
    pub caller: Address,
    pub range: u64,
    pub result: u64,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct RandomGenerator;

#[contractimpl]
impl RandomGenerator {
    /// Initialize the contract. May only be called once.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::DrawCount, &0u64);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // authorize / revoke
    // -----------------------------------------------------------------------

    /// Add a game contract to the caller whitelist. Admin only.
    pub fn authorize(env: Env, admin: Address, caller: Address) -> Result<(), Error> {
        require_initialized(&env)?;
        require_admin(&env, &admin)?;

        let key = DataKey::AuthorizedCaller(caller);
        env.storage().persistent().set(&key, &());
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);

        Ok(())
    }

    /// Remove a game contract from the caller whitelist. Admin only.
    pub fn revoke(env: Env, admin: Address, caller: Address) -> Result<(), Error> {
        require_initialized(&env)?;
        require_admin(&env, &admin)?;

        env.storage()
            .persistent()
            .remove(&DataKey::AuthorizedCaller(caller));

        Ok(())
    }

    // -----------------------------------------------------------------------
    // draw
    // -----------------------------------------------------------------------

    /// Return a value uniformly distributed over `[0, range)`.
    ///
    /// `caller` must sign the invocation and be whitelisted. When a contract
    /// calls with its own address the host authorizes it implicitly.
    pub fn draw(env: Env, caller: Address, range: u64) -> Result<u64, Error> {
        require_initialized(&env)?;

        if range == 0 {
            return Err(Error::InvalidBound);
        }

        caller.require_auth();

        if !env
            .storage()
            .persistent()
            .has(&DataKey::AuthorizedCaller(caller.clone()))
        {
            return Err(Error::UnauthorizedCaller);
        }

        let result: u64 = env.prng().gen_range(0..range);

        let count = read_draw_count(&env).saturating_add(1);
        env.storage().instance().set(&DataKey::DrawCount, &count);

        RandomDrawn { caller, range, result }.publish(&env);

        Ok(result)
    }

    /// Total number of draws served.
    pub fn draw_count(env: Env) -> Result<u64, Error> {
        require_initialized(&env)?;
        Ok(read_draw_count(&env))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !env.storage().instance().has(&DataKey::Admin) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    caller.require_auth();
    if caller != &admin {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

fn read_draw_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::DrawCount)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Env};

    /// Register contract + init. Returns (client, admin, game_contract).
    fn setup(env: &Env) -> (RandomGeneratorClient<'_>, Address, Address) {
        let admin = Address::generate(env);
        let game = Address::generate(env);

        let contract_id = env.register(RandomGenerator, ());
        let client = RandomGeneratorClient::new(env, &contract_id);

        env.mock_all_auths();
        client.init(&admin);
        client.authorize(&admin, &game);

        (client, admin, game)
    }

    #[test]
    fn test_draw_within_range() {
        let env = Env::default();
        let (client, _, game) = setup(&env);

        for range in [1u64, 2, 6, 1_000, 1_000_000] {
            let value = client.draw(&game, &range);
            assert!(value < range, "value {} out of range [0, {})", value, range);
        }
        assert_eq!(client.draw_count(), 5);
    }

    #[test]
    fn test_range_of_one_always_zero() {
        let env = Env::default();
        let (client, _, game) = setup(&env);

        for _ in 0..10 {
            assert_eq!(client.draw(&game, &1u64), 0);
        }
    }

    #[test]
    fn test_repeated_draws_vary() {
        let env = Env::default();
        let (client, _, game) = setup(&env);

        let first = client.draw(&game, &1_000_000u64);
        let mut varied = false;
        for _ in 0..8 {
            if client.draw(&game, &1_000_000u64) != first {
                varied = true;
            }
        }
        assert!(varied);
    }

    #[test]
    fn test_zero_range_rejected() {
        let env = Env::default();
        let (client, _, game) = setup(&env);

        assert_eq!(client.try_draw(&game, &0u64), Err(Ok(Error::InvalidBound)));
        assert_eq!(client.draw_count(), 0);
    }

    #[test]
    fn test_unauthorized_caller_rejected() {
        let env = Env::default();
        let (client, _, _) = setup(&env);

        let stranger = Address::generate(&env);
        assert_eq!(
            client.try_draw(&stranger, &10u64),
            Err(Ok(Error::UnauthorizedCaller))
        );
    }

    #[test]
    fn test_revoked_caller_rejected() {
        let env = Env::default();
        let (client, admin, game) = setup(&env);

        client.revoke(&admin, &game);

        assert_eq!(
            client.try_draw(&game, &10u64),
            Err(Ok(Error::UnauthorizedCaller))
        );
    }

    #[test]
    fn test_non_admin_cannot_authorize() {
        let env = Env::default();
        let (client, _, game) = setup(&env);

        let other = Address::generate(&env);
        assert_eq!(
            client.try_authorize(&game, &other),
            Err(Ok(Error::NotAuthorized))
        );
    }

    #[test]
    fn test_reinit_rejected() {
        let env = Env::default();
        let (client, admin, _) = setup(&env);

        assert_eq!(client.try_init(&admin), Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_draw_before_init_rejected() {
        let env = Env::default();
        let contract_id = env.register(RandomGenerator, ());
        let client = RandomGeneratorClient::new(&env, &contract_id);
        env.mock_all_auths();

        let game = Address::generate(&env);
        assert_eq!(client.try_draw(&game, &10u64), Err(Ok(Error::NotInitialized)));
    }
}
