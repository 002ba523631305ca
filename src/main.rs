use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    let rocket = bulletin_api::rocket();
    log::info!("Starting Bulletin API Server");
    rocket
}
