use chrono::NaiveDate;
use notifier_engine::{
    HttpPortalConnector, HttpSettings, PortalConnector, PortalCredentials, SourceFailure,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> HttpPortalConnector {
    HttpPortalConnector::new(
        PortalCredentials {
            url: format!("{}/bridge", server.uri()),
            username: "student".to_string(),
            password: "secret".to_string(),
        },
        HttpSettings::default(),
    )
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/bridge/session"))
        .and(body_json(json!({"username": "student", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_grades_with_session_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/bridge/grades"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "date": "2024-01-10",
            "subject": "Maths",
            "coefficient": "2",
            "average": "11.5",
            "max": "19",
            "min": "4",
            "grade": "15"
        }])))
        .mount(&server)
        .await;

    let source = connector(&server).connect().await.expect("connect ok");
    let grades = source.current_grades().await.expect("grades ok");

    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(grades[0].subject, "Maths");
    assert_eq!(grades[0].grade, "15");
}

#[tokio::test]
async fn fetches_lessons_for_a_given_day() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/bridge/lessons"))
        .and(query_param("date", "2024-01-12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "start": "2024-01-12T08:00:00",
                "end": "2024-01-12T09:00:00",
                "subject": "History",
                "cancelled": true
            },
            {
                "start": "2024-01-12T10:00:00",
                "end": "2024-01-12T11:00:00",
                "subject": "Physics"
            }
        ])))
        .mount(&server)
        .await;

    let source = connector(&server).connect().await.expect("connect ok");
    let lessons = source
        .lessons(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap())
        .await
        .expect("lessons ok");

    assert_eq!(lessons.len(), 2);
    assert!(lessons[0].cancelled);
    assert!(!lessons[1].cancelled);
}

#[tokio::test]
async fn fetches_announcements() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/bridge/announcements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "title": "Canteen",
            "author": "Mme Durand",
            "start_date": "2024-01-09T11:00:00",
            "content": "Rate the new menu.",
            "read": true,
            "survey": true
        }])))
        .mount(&server)
        .await;

    let source = connector(&server).connect().await.expect("connect ok");
    let announcements = source.announcements().await.expect("announcements ok");

    assert_eq!(announcements.len(), 1);
    assert!(announcements[0].survey);
    assert!(announcements[0].read);
}

#[tokio::test]
async fn rejected_login_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bridge/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = match connector(&server).connect().await {
        Ok(_) => panic!("login should fail"),
        Err(err) => err,
    };
    assert_eq!(err.kind, SourceFailure::Auth);
}

#[tokio::test]
async fn unreachable_portal_is_a_connection_failure() {
    // Nothing listens on the discard port.
    let connector = HttpPortalConnector::new(
        PortalCredentials {
            url: "http://127.0.0.1:9/".to_string(),
            username: "student".to_string(),
            password: "secret".to_string(),
        },
        HttpSettings::default(),
    );

    let err = match connector.connect().await {
        Ok(_) => panic!("connect should fail"),
        Err(err) => err,
    };
    assert_eq!(err.kind, SourceFailure::Connection);
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/bridge/grades"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let source = connector(&server).connect().await.expect("connect ok");
    let err = source.current_grades().await.unwrap_err();

    assert_eq!(err.kind, SourceFailure::Decode);
}

#[test]
fn credentials_debug_hides_the_password() {
    let credentials = PortalCredentials {
        url: "https://bridge.example.com".to_string(),
        username: "student".to_string(),
        password: "secret".to_string(),
    };

    let printed = format!("{credentials:?}");
    assert!(printed.contains("student"));
    assert!(!printed.contains("secret"));
}
