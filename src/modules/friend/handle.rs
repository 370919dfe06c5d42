use actix_web::{get, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::{
        friend::{
            model::{
                FriendRequestBody, FriendRequestCreated, FriendRequestOutcome,
                PendingRequestResponse,
            },
            service::FriendService,
        },
        user::model::UserResponse,
    },
    utils::{Claims, ValidatedJson},
};

#[post("/friend-request/{action}")]
pub async fn friend_request(
    friend_service: web::Data<FriendService>,
    action: web::Path<String>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestCreated>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let other_id =
        body.0.receiver_id.ok_or_else(|| error::Error::bad_request("Receiver must be specified"))?;

    match friend_service.apply_action(user_id, other_id, &action).await? {
        FriendRequestOutcome::Sent(friend_request_id) => {
            Ok(success::Success::created(Some(FriendRequestCreated { friend_request_id }))
                .message("Friend request sent"))
        }
        FriendRequestOutcome::Accepted => {
            Ok(success::Success::ok(None).message("Friend request accepted"))
        }
        FriendRequestOutcome::Rejected => {
            Ok(success::Success::ok(None).message("Friend request rejected"))
        }
    }
}

#[get("/friends")]
pub async fn list_friends(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserResponse>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends list retrieved successfully"))
}

#[get("/pending-requests")]
pub async fn list_pending_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PendingRequestResponse>>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.sub;
    let requests = friend_service.get_pending_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests))
        .message("Pending friend requests retrieved successfully"))
}
