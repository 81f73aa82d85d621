use super::{AppState, LookupFailure};
use crate::{
    domain::{Member, NewMember},
    ports::database::Error,
};
use axum::{
    extract::{Path, State},
    Json,
};

const NOT_A_NUMBER: &str = "Error: provided id or point amount is not a number.";

/// Response for any failed withdrawal.
///
/// Legitimate withdrawals are never negative, so -1 cannot collide with a
/// real result.
const WITHDRAW_FAILED: i64 = -1;

/// POST /database/addMember
pub async fn add_member(State(state): State<AppState>, Json(member): Json<NewMember>) -> String {
    match state.database.add_member(member).await {
        Ok(()) => "Member added successfully.".to_string(),
        // The store's rejection text goes to the caller as-is
        Err(Error::Constraint(message)) => message,
        Err(err) => {
            tracing::error!(error = %err, "member insert failed");
            "Could not enter member data due to an unknown error.".to_string()
        }
    }
}

/// POST /database/givePoints/{id}/{points}
pub async fn give_points(
    State(state): State<AppState>,
    Path((id, points)): Path<(String, String)>,
) -> String {
    let (Ok(card_id), Ok(points)) = (id.parse::<i64>(), points.parse::<u32>()) else {
        return NOT_A_NUMBER.to_string();
    };

    match state.database.give_fuel_points(card_id, points).await {
        Ok(()) => format!("Gave member {card_id} {points} points."),
        Err(err @ (Error::MemberNotFound(_) | Error::Constraint(_))) => err.to_string(),
        Err(err) => {
            tracing::error!(error = %err, card_id, "point credit failed");
            "Could not give member fuel points due to an unknown error.".to_string()
        }
    }
}

/// POST /database/withdrawPoints/{id}/{points}
///
/// Responds with the amount actually withdrawn, which is the requested amount
/// clamped to the member's balance. Every failure, malformed parameters
/// included, responds with the -1 sentinel.
pub async fn withdraw_points(
    State(state): State<AppState>,
    Path((id, points)): Path<(String, String)>,
) -> Json<i64> {
    let (Ok(card_id), Ok(points)) = (id.parse::<i64>(), points.parse::<u32>()) else {
        return Json(WITHDRAW_FAILED);
    };

    match state.database.withdraw_fuel_points(card_id, points).await {
        Ok(withdrawn) => Json(i64::from(withdrawn)),
        Err(err) => {
            tracing::warn!(error = %err, card_id, "point withdrawal failed");
            Json(WITHDRAW_FAILED)
        }
    }
}

/// GET /database/getMember/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Member>>, LookupFailure> {
    let Ok(card_id) = id.parse::<i64>() else {
        return Ok(Json(None));
    };

    Ok(Json(state.database.get_member(card_id).await?))
}

/// GET /database/getMemberByPhone/{phone}
pub async fn get_member_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<Option<Member>>, LookupFailure> {
    let Ok(phone_number) = phone.parse::<i64>() else {
        return Ok(Json(None));
    };

    Ok(Json(state.database.get_member_by_phone(phone_number).await?))
}
