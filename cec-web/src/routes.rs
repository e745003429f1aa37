//! HTTP route filters
//!
//! One warp filter per gateway route, combined with `.or()` and recovered
//! into plain-text status responses. The HTTP status vocabulary:
//!
//! - client mistakes (unknown device name, bad key identifier, non-digit
//!   channel) are 400 everywhere, including `GET /power/:device` where 404
//!   is reserved for the standby meaning;
//! - `GET /power/:device` keeps the original three-to-two collapse: 204 for
//!   on, 404 for standby, 500 with a diagnostic for anything else;
//! - `GET /sourcestatus` reports an explicit 404 when no active source is
//!   found;
//! - bus failures are 500 with the error rendered as the body.

use crate::context::GatewayContext;
use cec_core::{GatewayError, PowerReport, VolumeCommand};
use std::convert::Infallible;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Rejection wrapper carrying a gateway error through warp
#[derive(Debug)]
struct GatewayRejection(GatewayError);

impl warp::reject::Reject for GatewayRejection {}

fn reject(err: GatewayError) -> Rejection {
    warp::reject::custom(GatewayRejection(err))
}

fn with_context(
    context: GatewayContext,
) -> impl Filter<Extract = (GatewayContext,), Error = Infallible> + Clone {
    warp::any().map(move || context.clone())
}

/// Builds the complete gateway route tree.
pub fn routes(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    info(context.clone())
        .or(source_status(context.clone()))
        .or(power_status(context.clone()))
        .or(power_on(context.clone()))
        .or(power_off(context.clone()))
        .or(volume(context.clone()))
        .or(key(context.clone()))
        .or(channel(context.clone()))
        .or(transmit(context))
        .recover(handle_rejection)
}

/// GET /info
fn info(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("info")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(context))
        .and_then(|context: GatewayContext| async move {
            let devices = context.bus.list().await.map_err(|e| reject(e.into()))?;
            Ok::<_, Rejection>(warp::reply::json(&devices))
        })
}

/// GET /sourcestatus
fn source_status(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("sourcestatus")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(context))
        .and_then(|context: GatewayContext| async move {
            let status = context.interpreter.source_status().await.map_err(reject)?;
            let reply = match status {
                Some(source) => warp::reply::with_status(source.message(), StatusCode::OK),
                None => warp::reply::with_status(String::new(), StatusCode::NOT_FOUND),
            };
            Ok::<_, Rejection>(reply)
        })
}

/// GET /power/:device
fn power_status(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("power")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(context))
        .and_then(|device: String, context: GatewayContext| async move {
            let report = context
                .interpreter
                .power_report(&device)
                .await
                .map_err(reject)?;
            let code = match report {
                PowerReport::On => StatusCode::NO_CONTENT,
                PowerReport::Standby => StatusCode::NOT_FOUND,
            };
            Ok::<_, Rejection>(warp::reply::with_status(String::new(), code))
        })
}

/// PUT /power/:device
fn power_on(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("power")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_context(context))
        .and_then(|device: String, context: GatewayContext| async move {
            context
                .translator
                .power_on(&device)
                .await
                .map_err(reject)?;
            Ok::<_, Rejection>(StatusCode::NO_CONTENT)
        })
}

/// DELETE /power/:device
fn power_off(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("power")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_context(context))
        .and_then(|device: String, context: GatewayContext| async move {
            context
                .translator
                .power_off(&device)
                .await
                .map_err(reject)?;
            Ok::<_, Rejection>(StatusCode::NO_CONTENT)
        })
}

/// PUT /volume/up | /volume/down | /volume/mute
fn volume(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("volume")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_context(context))
        .and_then(|direction: String, context: GatewayContext| async move {
            // An unknown direction segment is no route at all, not a
            // gateway error.
            let command =
                VolumeCommand::parse(&direction).ok_or_else(warp::reject::not_found)?;
            context.translator.volume(command).await.map_err(reject)?;
            Ok::<_, Rejection>(StatusCode::NO_CONTENT)
        })
}

/// PUT /key/:device/:key
fn key(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("key")
        .and(warp::path::param::<String>())
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_context(context))
        .and_then(
            |device: String, key: String, context: GatewayContext| async move {
                context
                    .translator
                    .send_key(&device, &key)
                    .await
                    .map_err(reject)?;
                Ok::<_, Rejection>(StatusCode::NO_CONTENT)
            },
        )
}

/// PUT /channel/:device/:channel
fn channel(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("channel")
        .and(warp::path::param::<String>())
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_context(context))
        .and_then(
            |device: String, channel: String, context: GatewayContext| async move {
                let echoed = context
                    .translator
                    .change_channel(&device, &channel)
                    .await
                    .map_err(reject)?;
                Ok::<_, Rejection>(warp::reply::with_status(echoed, StatusCode::OK))
            },
        )
}

/// POST /transmit
fn transmit(
    context: GatewayContext,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("transmit")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<Vec<String>>())
        .and(with_context(context))
        .and_then(|commands: Vec<String>, context: GatewayContext| async move {
            context
                .translator
                .transmit(&commands)
                .await
                .map_err(reject)?;
            Ok::<_, Rejection>(StatusCode::NO_CONTENT)
        })
}

/// Maps rejections onto the gateway's plain-text status vocabulary.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if let Some(GatewayRejection(gateway_err)) = err.find() {
        let code = if gateway_err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if code.is_server_error() {
            warn!(error = %gateway_err, "Request failed");
        }
        (code, gateway_err.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, String::new())
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON array of command strings".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, String::new())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(message, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cec_bus::{LogicalAddress, PowerStatus, SimBus, SimDevice};
    use std::sync::Arc;

    fn context() -> GatewayContext {
        let bus = Arc::new(
            SimBus::new().with_device(
                SimDevice::new(LogicalAddress::TV, "TV")
                    .at("0.0.0.0")
                    .powered(PowerStatus::On)
                    .active(true),
            ),
        );
        GatewayContext::new(bus)
    }

    #[tokio::test]
    async fn test_power_status_on_is_204() {
        let reply = warp::test::request()
            .method("GET")
            .path("/power/tv")
            .reply(&routes(context()))
            .await;
        assert_eq!(reply.status(), 204);
    }

    #[tokio::test]
    async fn test_unknown_device_is_400_not_404() {
        let reply = warp::test::request()
            .method("GET")
            .path("/power/vcr")
            .reply(&routes(context()))
            .await;
        assert_eq!(reply.status(), 400);
        assert!(std::str::from_utf8(reply.body()).unwrap().contains("vcr"));
    }

    #[tokio::test]
    async fn test_unknown_volume_direction_is_404() {
        let reply = warp::test::request()
            .method("PUT")
            .path("/volume/sideways")
            .reply(&routes(context()))
            .await;
        assert_eq!(reply.status(), 404);
    }

    #[tokio::test]
    async fn test_transmit_malformed_body_is_400() {
        let reply = warp::test::request()
            .method("POST")
            .path("/transmit")
            .body("{\"not\": \"an array\"}")
            .reply(&routes(context()))
            .await;
        assert_eq!(reply.status(), 400);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let reply = warp::test::request()
            .method("POST")
            .path("/power/tv")
            .reply(&routes(context()))
            .await;
        assert_eq!(reply.status(), 405);
    }
}
