use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wp_xmlrpc::{ApiError, HealthCheck, Value, WordPressClient, XmlRpcClient};

fn xml_response(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml; charset=UTF-8")
        .set_body_string(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <methodResponse><params><param><value>{value}</value></param></params></methodResponse>"
        ))
}

fn fault_response(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\
         <member><name>faultString</name><value><string>{message}</string></value></member>\
         </struct></value></fault></methodResponse>"
    ))
}

// ---------------------------------------------------------------------------
// XmlRpcClient tests
// ---------------------------------------------------------------------------

mod xmlrpc_client {
    use super::*;

    #[test]
    fn new_with_valid_url() {
        let client = XmlRpcClient::new("http://localhost:8080/xmlrpc.php");
        assert!(client.is_ok());
    }

    #[test]
    fn new_with_invalid_url() {
        let result = XmlRpcClient::new("not a url");
        assert!(matches!(result.unwrap_err(), ApiError::InvalidUrl(_)));
    }

    #[test]
    fn debug_impl_shows_endpoint() {
        let client = XmlRpcClient::new("http://example.com/xmlrpc.php").unwrap();
        let debug = format!("{client:?}");
        assert!(
            debug.contains("XmlRpcClient") && debug.contains("http://example.com/xmlrpc.php"),
            "unexpected Debug output: {debug}"
        );
    }

    #[tokio::test]
    async fn call_posts_method_call_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(header("content-type", "text/xml"))
            .and(body_string_contains("<methodName>demo.addTwoNumbers</methodName>"))
            .and(body_string_contains(
                "<param><value><int>2</int></value></param><param><value><int>3</int></value></param>",
            ))
            .respond_with(xml_response("<int>5</int>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = XmlRpcClient::new(&format!("{}/rpc", server.uri())).unwrap();
        let value = client
            .call("demo.addTwoNumbers", &[Value::from(2), Value::from(3)])
            .await
            .unwrap();
        assert_eq!(value, Value::Int(5));
    }

    #[tokio::test]
    async fn call_returns_api_error_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let client = XmlRpcClient::new(&format!("{}/rpc", server.uri())).unwrap();
        match client.call("demo.sayHello", &[]).await.unwrap_err() {
            ApiError::ApiResponse { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("expected ApiResponse, got: {other}"),
        }
    }

    #[tokio::test]
    async fn call_returns_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(fault_response(-32601, "server error. requested method does not exist."))
            .mount(&server)
            .await;

        let client = XmlRpcClient::new(&format!("{}/rpc", server.uri())).unwrap();
        match client.call("demo.nope", &[]).await.unwrap_err() {
            ApiError::Fault { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "server error. requested method does not exist.");
            }
            other => panic!("expected Fault, got: {other}"),
        }
    }

    #[tokio::test]
    async fn call_rejects_non_xmlrpc_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("XML-RPC server accepts POST requests only."),
            )
            .mount(&server)
            .await;

        let client = XmlRpcClient::new(&format!("{}/rpc", server.uri())).unwrap();
        let err = client.call("demo.sayHello", &[]).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Malformed(_) | ApiError::Xml(_)),
            "expected a decode error, got: {err}"
        );
    }

    #[tokio::test]
    async fn call_fails_on_unreachable_host() {
        // Port 1 on loopback is not expected to accept connections.
        let client = XmlRpcClient::new("http://127.0.0.1:1/xmlrpc.php").unwrap();
        let err = client.call("demo.sayHello", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)), "got: {err}");
    }
}

// ---------------------------------------------------------------------------
// WordPressClient tests
// ---------------------------------------------------------------------------

mod wordpress_client {
    use super::*;

    const EMPTY_CALL: &str = "<?xml version=\"1.0\"?><methodCall><methodName>demo.sayHello</methodName><params/></methodCall>";

    #[test]
    fn new_appends_xmlrpc_path() {
        let client = WordPressClient::new("http://blog.example.com").unwrap();
        assert_eq!(
            client.rpc().endpoint().as_str(),
            "http://blog.example.com/xmlrpc.php"
        );
    }

    #[test]
    fn new_keeps_sub_path_and_trims_slash() {
        let client = WordPressClient::new("http://example.com/blog/").unwrap();
        assert_eq!(
            client.rpc().endpoint().as_str(),
            "http://example.com/blog/xmlrpc.php"
        );
    }

    #[test]
    fn new_rejects_invalid_url() {
        assert!(matches!(
            WordPressClient::new("blog.example.com").unwrap_err(),
            ApiError::InvalidUrl(_)
        ));
    }

    #[tokio::test]
    async fn say_hello_sends_argumentless_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlrpc.php"))
            .and(body_string(EMPTY_CALL))
            .respond_with(xml_response("<string>Hello!</string>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert_eq!(client.say_hello().await.unwrap(), "Hello!");
    }

    #[tokio::test]
    async fn say_hello_rejects_non_string_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlrpc.php"))
            .respond_with(xml_response("<boolean>1</boolean>"))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        match client.say_hello().await.unwrap_err() {
            ApiError::UnexpectedType { expected, found } => {
                assert_eq!(expected, "string");
                assert_eq!(found, "boolean");
            }
            other => panic!("expected UnexpectedType, got: {other}"),
        }
    }

    #[tokio::test]
    async fn is_healthy_true_for_greeting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlrpc.php"))
            .respond_with(xml_response("<string>Hello!</string>"))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert!(client.is_healthy().await.unwrap());
    }

    #[tokio::test]
    async fn is_healthy_false_for_empty_greeting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlrpc.php"))
            .respond_with(xml_response("<string></string>"))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert!(!client.is_healthy().await.unwrap());
    }

    #[tokio::test]
    async fn is_healthy_errors_on_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlrpc.php"))
            .respond_with(fault_response(405, "XML-RPC services are disabled on this site."))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert!(matches!(
            client.is_healthy().await,
            Err(ApiError::Fault { code: 405, .. })
        ));
    }
}
