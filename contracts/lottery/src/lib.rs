//! Stellarcade Lottery Contract
//!
//! Runs any number of independent numbered lotteries. Each lottery escrows a
//! prize lot from its creator, sells uniquely numbered tickets for a fixed
//! price in the contract's payment token, draws a number once sales have
//! closed, and settles along exactly one of two terminal paths:
//!
//! - **Won**: a draw hits a sold number. The holder of that ticket claims the
//!   prize; the holder of the lottery's withdrawal capability collects the
//!   ticket revenue.
//! - **Cancelled**: nobody managed a successful draw within
//!   `CANCELLATION_WINDOW_SECS` after `end_time`. Every ticket can be refunded
//!   once and the capability holder takes the prize back.
//!
//! ## Ownership Model
//! Tickets and withdrawal capabilities are stored records bound to exactly one
//! lottery id. Possession means the stored `owner` / `holder` address
//! authorizes the call. Both can be handed over with `transfer_ticket` /
//! `transfer_capability`.
//!
//! ## Randomness
//! `run` asks the configured randomness source for a value in
//! `[0, number_range)` and hands it to [`Lottery::apply_draw`], which is pure
//! and checks every draw precondition. A draw that lands on an unsold number
//! changes nothing; `run` can be called again.
//!
//! ## Storage Strategy
//! - `instance()`: Admin, PaymentToken, RandomnessSource, NextId.
//! - `persistent()`: Lottery, Ticket, Capability records plus per-number
//!   Sold / Refunded flags. TTL bumped on every write.
//!
//! ## Invariant
//! For every lottery, `escrow_balance == sold_count * ticket_price -
//! refunded - withdrawn`. When no held prize is denominated in the payment
//! token, the contract's payment token balance equals the sum of all
//! lotteries' `escrow_balance`, assuming no direct transfers to the contract
//! address.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::{
    contract, contractclient, contracterror, contractevent, contractimpl, contracttype, log,
    token::TokenClient, Address, Env,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// Smallest allowed `number_range`.
pub const MIN_NUMBER_RANGE: u64 = 1_000;

/// Seconds after `end_time` at which an undrawn lottery becomes refundable.
pub const CANCELLATION_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized          = 1,
    NotInitialized              = 2,
    NotAuthorized               = 3,
    InvalidAmount               = 4,
    /// Number range below minimum, ticket number out of range, or
    /// `end_time <= start_time`.
    InvalidRange                = 5,
    InvalidParticipants         = 6,
    TimeInPast                  = 7,
    LotteryNotFound             = 8,
    LotteryCancelled            = 9,
    LotteryAlreadyRun           = 10,
    TicketAlreadyGone           = 11,
    InsufficientFunds           = 12,
    LotteryNotEnded             = 13,
    /// Fewer tickets sold than `min_participants`.
    InvalidNumberOfParticipants = 14,
    LotteryHasNoWinningNumber   = 15,
    /// Ticket belongs to a different lottery.
    InvalidLottery              = 16,
    NoPrizeAvailable            = 17,
    NotWinningNumber            = 18,
    /// Capability is unknown or bound to a different lottery.
    NoWithdrawalCapability      = 19,
    NotCancelled                = 20,
    /// Unknown ticket, or its number was never sold or already refunded.
    TicketNotFound              = 21,
    Overflow                    = 22,
}

// ---------------------------------------------------------------------------
// Storage Types
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Admin,
    PaymentToken,
    RandomnessSource,
    /// Next identifier handed out to a lottery, ticket or capability.
    NextId,
    // --- persistent() ---
    Lottery(u64),
    Ticket(u64),
    Capability(u64),
    /// Presence flag: `(lottery_id, number)` has been sold.
    Sold(u64, u64),
    /// Presence flag: the ticket for `(lottery_id, number)` has been refunded.
    Refunded(u64, u64),
}

/// A lot of some SEP-41 asset held in escrow as a lottery's prize.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Prize {
    pub token: Address,
    pub amount: i128,
}

/// Escrow slot for a lottery's prize.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrizeSlot {
    /// Claimed by the winner or returned after cancellation.
    Empty,
    Held(Prize),
}

impl PrizeSlot {
    /// Empty the slot, returning what it held.
    pub fn take(&mut self) -> Option<Prize> {
        match core::mem::replace(self, PrizeSlot::Empty) {
            PrizeSlot::Held(prize) => Some(prize),
            PrizeSlot::Empty => None,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lottery {
    pub id: u64,
    pub creator: Address,
    pub prize: PrizeSlot,
    pub min_participants: u32,
    pub ticket_price: i128,
    pub escrow_balance: i128,
    /// Valid ticket numbers are `[0, number_range)`.
    pub number_range: u64,
    /// Set once by a successful draw, never cleared.
    pub winning_number: Option<u64>,
    pub start_time: u64,
    pub end_time: u64,
    /// Count of `Sold` flags for this lottery; never decreases.
    pub sold_count: u32,
    pub cancelled: bool,
}

/// Receipt for one purchased number.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ticket {
    pub id: u64,
    pub lottery_id: u64,
    pub number: u64,
    pub owner: Address,
}

/// Sole authorization to withdraw a lottery's revenue or reclaim its prize.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalCapability {
    pub id: u64,
    pub lottery_id: u64,
    pub holder: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub payment_token: Address,
    pub randomness_source: Address,
}

// ---------------------------------------------------------------------------
// Randomness source interface
// ---------------------------------------------------------------------------

/// Any contract that can serve a value uniformly distributed over
/// `[0, range)` to `caller`.
#[contractclient(name = "RandomnessSourceClient")]
pub trait RandomnessSource {
    fn draw(env: Env, caller: Address, range: u64) -> u64;
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct LotteryCreated {
    #[topic]
    pub lottery: u64,
    pub capability: u64,
}

#[contractevent]
pub struct LotteryTicketBought {
    #[topic]
    pub lottery: u64,
    pub ticket_number: u64,
}

#[contractevent]
pub struct LotteryWinner {
    #[topic]
    pub lottery: u64,
    pub winning_number: u64,
}

#[contractevent]
pub struct LotteryWithdrawal {
    #[topic]
    pub lottery: u64,
    #[topic]
    pub recipient: Address,
    pub amount: i128,
}

// ---------------------------------------------------------------------------
// Lottery state machine
// ---------------------------------------------------------------------------

impl Lottery {
    /// Ledger time from which an undrawn lottery may be cancelled.
    pub fn cancellation_opens_at(&self) -> u64 {
        self.end_time.saturating_add(CANCELLATION_WINDOW_SECS)
    }

    /// True if the lottery is cancelled or would be on the next refund or
    /// prize return.
    pub fn is_cancellable(&self, now: u64) -> bool {
        self.cancelled
            || (self.winning_number.is_none() && now >= self.cancellation_opens_at())
    }

    /// Set the `cancelled` flag if the cancellation window is open. Returns
    /// `true` only on the call that flips the flag.
    pub fn cancel_if_due(&mut self, now: u64) -> Result<bool, Error> {
        if self.cancelled {
            return Ok(false);
        }
        if !self.is_cancellable(now) {
            return Err(Error::NotCancelled);
        }
        self.cancelled = true;
        Ok(true)
    }

    /// Check that a draw may be attempted at `now`.
    pub fn ensure_drawable(&self, now: u64) -> Result<(), Error> {
        if self.winning_number.is_some() {
            return Err(Error::LotteryAlreadyRun);
        }
        if self.cancelled {
            return Err(Error::LotteryCancelled);
        }
        if now < self.end_time {
            return Err(Error::LotteryNotEnded);
        }
        if self.sold_count < self.min_participants {
            return Err(Error::InvalidNumberOfParticipants);
        }
        Ok(())
    }

    /// Apply a drawn value. Sets `winning_number` and returns `true` when the
    /// value is a sold number; otherwise leaves the lottery untouched.
    pub fn apply_draw(
        &mut self,
        drawn: u64,
        now: u64,
        is_sold: impl Fn(u64) -> bool,
    ) -> Result<bool, Error> {
        self.ensure_drawable(now)?;

        if drawn >= self.number_range || !is_sold(drawn) {
            return Ok(false);
        }

        self.winning_number = Some(drawn);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct LotteryContract;

#[contractimpl]
impl LotteryContract {
    // -----------------------------------------------------------------------
    // init / config
    // -----------------------------------------------------------------------

    /// Initialize the contract. May only be called once.
    ///
    /// `payment_token` is the SEP-41 token every lottery sells tickets in.
    /// `randomness_source` must implement [`RandomnessSource`] and accept this
    /// contract as a caller.
    pub fn init(
        env: Env,
        admin: Address,
        payment_token: Address,
        randomness_source: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::PaymentToken, &payment_token);
        env.storage()
            .instance()
            .set(&DataKey::RandomnessSource, &randomness_source);
        env.storage().instance().set(&DataKey::NextId, &1u64);

        Ok(())
    }

    /// Replace the randomness source. Admin only.
    pub fn set_randomness_source(env: Env, admin: Address, source: Address) -> Result<(), Error> {
        require_initialized(&env)?;
        require_admin(&env, &admin)?;

        env.storage().instance().set(&DataKey::RandomnessSource, &source);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        require_initialized(&env)?;
        Ok(Config {
            admin: get_instance(&env, &DataKey::Admin)?,
            payment_token: get_instance(&env, &DataKey::PaymentToken)?,
            randomness_source: get_instance(&env, &DataKey::RandomnessSource)?,
        })
    }

    // -----------------------------------------------------------------------
    // create
    // -----------------------------------------------------------------------

    /// Open a new lottery and escrow its prize from `creator`.
    ///
    /// A withdrawal capability bound to the new lottery is issued to
    /// `capability_recipient`. Returns the lottery id.
    pub fn create(
        env: Env,
        creator: Address,
        prize: Prize,
        min_participants: u32,
        ticket_price: i128,
        number_range: u64,
        start_time: u64,
        end_time: u64,
        capability_recipient: Address,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;

        if number_range < MIN_NUMBER_RANGE {
            return Err(Error::InvalidRange);
        }
        if min_participants < 1 {
            return Err(Error::InvalidParticipants);
        }
        if ticket_price < 0 || prize.amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        if start_time < now || end_time < now {
            return Err(Error::TimeInPast);
        }
        if end_time <= start_time {
            return Err(Error::InvalidRange);
        }

        creator.require_auth();

        TokenClient::new(&env, &prize.token).transfer(
            &creator,
            env.current_contract_address(),
            &prize.amount,
        );

        let lottery_id = next_id(&env)?;
        let capability_id = next_id(&env)?;

        let lottery = Lottery {
            id: lottery_id,
            creator,
            prize: PrizeSlot::Held(prize),
            min_participants,
            ticket_price,
            escrow_balance: 0,
            number_range,
            winning_number: None,
            start_time,
            end_time,
            sold_count: 0,
            cancelled: false,
        };
        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);

        let capability = WithdrawalCapability {
            id: capability_id,
            lottery_id,
            holder: capability_recipient,
        };
        set_persistent(&env, DataKey::Capability(capability_id), &capability);

        LotteryCreated { lottery: lottery_id, capability: capability_id }.publish(&env);

        Ok(lottery_id)
    }

    // -----------------------------------------------------------------------
    // buy
    // -----------------------------------------------------------------------

    /// Buy `ticket_number` for `recipient`, paid by `payer`.
    ///
    /// `payment` is what the payer offers; only `ticket_price` is debited, so
    /// any excess never leaves the payer. Returns the ticket id.
    pub fn buy(
        env: Env,
        lottery_id: u64,
        payer: Address,
        ticket_number: u64,
        payment: i128,
        recipient: Address,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;

        if lottery.cancelled {
            return Err(Error::LotteryCancelled);
        }
        if lottery.winning_number.is_some() {
            return Err(Error::LotteryAlreadyRun);
        }
        if ticket_number >= lottery.number_range {
            return Err(Error::InvalidRange);
        }
        if is_sold(&env, lottery_id, ticket_number) {
            return Err(Error::TicketAlreadyGone);
        }
        if payment < 0 {
            return Err(Error::InvalidAmount);
        }
        if payment < lottery.ticket_price {
            return Err(Error::InsufficientFunds);
        }

        payer.require_auth();

        if lottery.ticket_price > 0 {
            TokenClient::new(&env, &payment_token(&env)?).transfer(
                &payer,
                env.current_contract_address(),
                &lottery.ticket_price,
            );
        }

        lottery.sold_count = lottery.sold_count.checked_add(1).ok_or(Error::Overflow)?;
        lottery.escrow_balance = lottery
            .escrow_balance
            .checked_add(lottery.ticket_price)
            .ok_or(Error::Overflow)?;

        set_persistent(&env, DataKey::Sold(lottery_id, ticket_number), &());
        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);

        let ticket_id = next_id(&env)?;
        let ticket = Ticket {
            id: ticket_id,
            lottery_id,
            number: ticket_number,
            owner: recipient,
        };
        set_persistent(&env, DataKey::Ticket(ticket_id), &ticket);

        LotteryTicketBought { lottery: lottery_id, ticket_number }.publish(&env);

        Ok(ticket_id)
    }

    // -----------------------------------------------------------------------
    // run
    // -----------------------------------------------------------------------

    /// Draw a number and, if it was sold, make it the winning number.
    ///
    /// Anyone may call this. Returns `true` when a winner was set and `false`
    /// when the draw missed, in which case the lottery is unchanged and `run`
    /// may be called again.
    pub fn run(env: Env, lottery_id: u64) -> Result<bool, Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;
        let now = env.ledger().timestamp();

        lottery.ensure_drawable(now)?;

        let source: Address = get_instance(&env, &DataKey::RandomnessSource)?;
        let drawn = RandomnessSourceClient::new(&env, &source)
            .draw(&env.current_contract_address(), &lottery.number_range);

        let won = lottery.apply_draw(drawn, now, |n| is_sold(&env, lottery_id, n))?;
        if !won {
            log!(&env, "draw missed", lottery_id, drawn);
            return Ok(false);
        }

        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);

        LotteryWinner { lottery: lottery_id, winning_number: drawn }.publish(&env);

        Ok(true)
    }

    // -----------------------------------------------------------------------
    // claim_prize
    // -----------------------------------------------------------------------

    /// Send the prize to `recipient` in exchange for the winning ticket, which
    /// is burned.
    pub fn claim_prize(
        env: Env,
        lottery_id: u64,
        ticket_id: u64,
        recipient: Address,
    ) -> Result<(), Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;
        let ticket = read_ticket(&env, ticket_id)?;
        ticket.owner.require_auth();

        let winning_number = lottery
            .winning_number
            .ok_or(Error::LotteryHasNoWinningNumber)?;
        if ticket.lottery_id != lottery.id {
            return Err(Error::InvalidLottery);
        }
        let prize = lottery.prize.take().ok_or(Error::NoPrizeAvailable)?;
        if ticket.number != winning_number {
            return Err(Error::NotWinningNumber);
        }

        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);
        env.storage().persistent().remove(&DataKey::Ticket(ticket_id));

        TokenClient::new(&env, &prize.token).transfer(
            &env.current_contract_address(),
            &recipient,
            &prize.amount,
        );

        Ok(())
    }

    // -----------------------------------------------------------------------
    // withdraw
    // -----------------------------------------------------------------------

    /// Pay the whole escrow balance of a drawn lottery to `recipient`.
    ///
    /// The capability is not consumed; later calls pay out whatever has
    /// accrued since, which is normally nothing. Returns the amount paid.
    pub fn withdraw(
        env: Env,
        lottery_id: u64,
        capability_id: u64,
        recipient: Address,
    ) -> Result<i128, Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;

        // Checked first: a cancelled lottery's capability may already be gone.
        if lottery.cancelled {
            return Err(Error::LotteryCancelled);
        }

        let capability = read_capability(&env, capability_id, lottery_id)?;
        capability.holder.require_auth();

        if lottery.winning_number.is_none() {
            return Err(Error::LotteryHasNoWinningNumber);
        }

        let amount = lottery.escrow_balance;
        lottery.escrow_balance = 0;
        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);

        if amount > 0 {
            TokenClient::new(&env, &payment_token(&env)?).transfer(
                &env.current_contract_address(),
                &recipient,
                &amount,
            );
        }

        LotteryWithdrawal { lottery: lottery_id, recipient, amount }.publish(&env);

        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // refund
    // -----------------------------------------------------------------------

    /// Return the ticket price to `recipient` once the lottery is cancelled.
    ///
    /// The first refund or prize return after the cancellation window opens
    /// sets the `cancelled` flag. The ticket is burned and its number stays
    /// sold. Returns the amount refunded.
    pub fn refund(
        env: Env,
        lottery_id: u64,
        ticket_id: u64,
        recipient: Address,
    ) -> Result<i128, Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;
        let ticket = read_ticket(&env, ticket_id)?;
        ticket.owner.require_auth();

        if ticket.lottery_id != lottery.id {
            return Err(Error::InvalidLottery);
        }

        let now = env.ledger().timestamp();
        if lottery.cancel_if_due(now)? {
            log!(&env, "lottery cancelled", lottery_id, now);
        }

        let refunded_key = DataKey::Refunded(lottery_id, ticket.number);
        if !is_sold(&env, lottery_id, ticket.number)
            || env.storage().persistent().has(&refunded_key)
        {
            return Err(Error::TicketNotFound);
        }

        let amount = lottery.ticket_price;
        lottery.escrow_balance = lottery
            .escrow_balance
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;

        set_persistent(&env, refunded_key, &());
        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);
        env.storage().persistent().remove(&DataKey::Ticket(ticket_id));

        if amount > 0 {
            TokenClient::new(&env, &payment_token(&env)?).transfer(
                &env.current_contract_address(),
                &recipient,
                &amount,
            );
        }

        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // return_prize
    // -----------------------------------------------------------------------

    /// Hand the prize of a cancelled lottery to `recipient` and destroy the
    /// capability used to do it.
    pub fn return_prize(
        env: Env,
        lottery_id: u64,
        capability_id: u64,
        recipient: Address,
    ) -> Result<(), Error> {
        require_initialized(&env)?;
        let mut lottery = read_lottery(&env, lottery_id)?;
        let capability = read_capability(&env, capability_id, lottery_id)?;
        capability.holder.require_auth();

        let now = env.ledger().timestamp();
        if lottery.cancel_if_due(now)? {
            log!(&env, "lottery cancelled", lottery_id, now);
        }

        let prize = lottery.prize.take().ok_or(Error::NoPrizeAvailable)?;

        set_persistent(&env, DataKey::Lottery(lottery_id), &lottery);
        env.storage()
            .persistent()
            .remove(&DataKey::Capability(capability_id));

        TokenClient::new(&env, &prize.token).transfer(
            &env.current_contract_address(),
            &recipient,
            &prize.amount,
        );

        Ok(())
    }

    // -----------------------------------------------------------------------
    // burn_ticket
    // -----------------------------------------------------------------------

    /// Destroy a ticket. Does not touch the lottery: the number stays sold and
    /// no funds move.
    pub fn burn_ticket(env: Env, ticket_id: u64) -> Result<(), Error> {
        require_initialized(&env)?;
        let ticket = read_ticket(&env, ticket_id)?;
        ticket.owner.require_auth();

        env.storage().persistent().remove(&DataKey::Ticket(ticket_id));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // transfers
    // -----------------------------------------------------------------------

    pub fn transfer_ticket(env: Env, ticket_id: u64, to: Address) -> Result<(), Error> {
        require_initialized(&env)?;
        let mut ticket = read_ticket(&env, ticket_id)?;
        ticket.owner.require_auth();

        ticket.owner = to;
        set_persistent(&env, DataKey::Ticket(ticket_id), &ticket);
        Ok(())
    }

    pub fn transfer_capability(env: Env, capability_id: u64, to: Address) -> Result<(), Error> {
        require_initialized(&env)?;
        let mut capability: WithdrawalCapability = env
            .storage()
            .persistent()
            .get(&DataKey::Capability(capability_id))
            .ok_or(Error::NoWithdrawalCapability)?;
        capability.holder.require_auth();

        capability.holder = to;
        set_persistent(&env, DataKey::Capability(capability_id), &capability);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // views
    // -----------------------------------------------------------------------

    pub fn get_lottery(env: Env, lottery_id: u64) -> Result<Lottery, Error> {
        require_initialized(&env)?;
        read_lottery(&env, lottery_id)
    }

    pub fn get_ticket(env: Env, ticket_id: u64) -> Result<Ticket, Error> {
        require_initialized(&env)?;
        read_ticket(&env, ticket_id)
    }

    pub fn get_capability(env: Env, capability_id: u64) -> Result<WithdrawalCapability, Error> {
        require_initialized(&env)?;
        env.storage()
            .persistent()
            .get(&DataKey::Capability(capability_id))
            .ok_or(Error::NoWithdrawalCapability)
    }

    pub fn is_sold(env: Env, lottery_id: u64, ticket_number: u64) -> Result<bool, Error> {
        require_initialized(&env)?;
        read_lottery(&env, lottery_id)?;
        Ok(is_sold(&env, lottery_id, ticket_number))
    }

    /// Whether refunds and prize return are open right now. Does not set the
    /// `cancelled` flag.
    pub fn is_cancellable(env: Env, lottery_id: u64) -> Result<bool, Error> {
        require_initialized(&env)?;
        let lottery = read_lottery(&env, lottery_id)?;
        Ok(lottery.is_cancellable(env.ledger().timestamp()))
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
    let admin: Address = get_instance(env, &DataKey::Admin)?;
    caller.require_auth();
    if caller != &admin {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

fn get_instance(env: &Env, key: &DataKey) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(Error::NotInitialized)
}

fn payment_token(env: &Env) -> Result<Address, Error> {
    get_instance(env, &DataKey::PaymentToken)
}

/// Hand out the next identifier from the shared sequence.
fn next_id(env: &Env) -> Result<u64, Error> {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextId)
        .unwrap_or(1);
    let next = id.checked_add(1).ok_or(Error::Overflow)?;
    env.storage().instance().set(&DataKey::NextId, &next);
    Ok(id)
}

fn read_lottery(env: &Env, lottery_id: u64) -> Result<Lottery, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Lottery(lottery_id))
        .ok_or(Error::LotteryNotFound)
}

fn read_ticket(env: &Env, ticket_id: u64) -> Result<Ticket, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Ticket(ticket_id))
        .ok_or(Error::TicketNotFound)
}

/// Load a capability and check it is bound to `lottery_id`.
fn read_capability(
    env: &Env,
    capability_id: u64,
    lottery_id: u64,
) -> Result<WithdrawalCapability, Error> {
    let capability: WithdrawalCapability = env
        .storage()
        .persistent()
        .get(&DataKey::Capability(capability_id))
        .ok_or(Error::NoWithdrawalCapability)?;
    if capability.lottery_id != lottery_id {
        return Err(Error::NoWithdrawalCapability);
    }
    Ok(capability)
}

fn is_sold(env: &Env, lottery_id: u64, ticket_number: u64) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Sold(lottery_id, ticket_number))
}

fn set_persistent<T>(env: &Env, key: DataKey, value: &T)
where
    T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(&key, value);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
