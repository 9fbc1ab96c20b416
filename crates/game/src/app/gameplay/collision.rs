use engine::Vec2;

use super::types::{Coin, Flag};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PickupRadii {
    pub(crate) coin_px: f32,
    pub(crate) flag_px: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CollisionReport {
    pub(crate) collected_coins: Vec<usize>,
    pub(crate) flag_reached: bool,
}

pub(crate) fn resolve_collisions(
    player_px: Vec2,
    coins: &mut [Coin],
    flag: &mut Flag,
    radii: PickupRadii,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    for (index, coin) in coins.iter_mut().enumerate() {
        if coin.collected {
            continue;
        }
        if player_px.distance(coin.entity.anchor_px) < radii.coin_px {
            coin.collected = true;
            report.collected_coins.push(index);
        }
    }

    if !flag.reached && player_px.distance(flag.entity.anchor_px) < radii.flag_px {
        flag.reached = true;
        report.flag_reached = true;
    }
    report
}
