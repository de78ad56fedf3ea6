//! Pause protocol: runs whenever the draw pile is found empty.
//!
//! 1. Record every seat's hand size.
//! 2. Seats over the hand ceiling surrender cards face-down, one
//!    `discard_card` call at a time, until they are at the ceiling.
//! 3. Surrendered cards join the discard pile, which is shuffled into the
//!    new draw pile. The top card stays where it is.

use log::debug;

use crate::core::{GameRng, HoldingPile, Result, SeatId, SimError};
use crate::strategy::Strategy;

use super::table::Table;

/// Run the pause protocol, returning the hand sizes recorded before any
/// card was surrendered.
pub fn run_pause(
    table: &mut Table,
    seats: &mut [Box<dyn Strategy>],
    rng: &mut GameRng,
) -> Result<Vec<usize>> {
    let recorded = table.hand_sizes().as_slice().to_vec();
    let mut holding = HoldingPile::new();

    let surrendered = surrender_excess(table, seats, &mut holding);
    debug!("Pause: {} cards surrendered, hand sizes were {recorded:?}", holding.len());
    // Cards already surrendered stay on the table even when a seat fails
    holding.release_into(table.discard_mut());
    surrendered?;

    table.recycle_discard(rng);
    Ok(recorded)
}

fn surrender_excess(
    table: &mut Table,
    seats: &mut [Box<dyn Strategy>],
    holding: &mut HoldingPile,
) -> Result<()> {
    let ceiling = table.rules().hand_ceiling;
    for seat in SeatId::all(table.player_count()) {
        while table.hand(seat).len() > ceiling {
            let turn = table
                .turn_info()
                .ok_or_else(|| SimError::InvalidState("pause before the first deal".into()))?;
            let card = seats[seat.index()].discard_card(&table.view(seat), &turn);
            holding.stash(table.take_from_hand(seat, card)?);
            debug!("{seat} surrendered {card}");
        }
    }
    Ok(())
}
