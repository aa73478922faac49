//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route; this module only wires them
//! together with the shared configuration and upstream client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;
use crate::domains::upstream::UpstreamClient;

use super::definitions::{CheckImageTool, FileOperationTool, GetFoodMenuTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>, upstream: Arc<UpstreamClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(CheckImageTool::create_route(
            config.clone(),
            upstream.clone(),
        ))
        .with_route(GetFoodMenuTool::create_route(
            config.clone(),
            upstream.clone(),
        ))
        .with_route(FileOperationTool::create_route(config, upstream))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let config = Arc::new(Config::default());
        let upstream = Arc::new(UpstreamClient::new());

        let router: ToolRouter<TestServer> = build_tool_router(config, upstream);
        let tools = router.list_all();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"checkImage"));
        assert!(names.contains(&"getFoodMenu"));
        assert!(names.contains(&"fileOperation"));
    }

    #[test]
    fn test_every_tool_has_a_description() {
        let config = Arc::new(Config::default());
        let upstream = Arc::new(UpstreamClient::new());

        let router: ToolRouter<TestServer> = build_tool_router(config, upstream);
        for tool in router.list_all() {
            assert!(tool.description.as_ref().is_some_and(|d| !d.is_empty()));
        }
    }
}
