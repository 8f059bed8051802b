use super::channel::ExchangeKind;
use super::topology::TopologyParams;

/// 队列布局
///
/// - `Durable`：默认交换机，路由键与队列名均为主题；所有消费者竞争同一队列；
/// - `FanOut`：以主题命名的 fanout 交换机，每个消费组一个队列 `<topic>.<group>`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueLayout {
    Durable,
    FanOut,
}

impl QueueLayout {
    /// 发布目标 (交换机, 路由键)
    pub fn publish_target(self, topic: &str) -> (String, String) {
        match self {
            QueueLayout::Durable => (String::new(), topic.to_owned()),
            QueueLayout::FanOut => (topic.to_owned(), String::new()),
        }
    }

    pub fn queue_name(self, topic: &str, consumer_group: &str) -> String {
        match self {
            QueueLayout::Durable => topic.to_owned(),
            QueueLayout::FanOut => format!("{topic}.{consumer_group}"),
        }
    }

    /// 订阅侧需要声明的主队列参数
    pub fn params(self, topic: &str, consumer_group: &str) -> TopologyParams {
        let queue = self.queue_name(topic, consumer_group);
        match self {
            QueueLayout::Durable => TopologyParams::builder().queue(queue).build(),
            QueueLayout::FanOut => TopologyParams::builder()
                .queue(queue)
                .exchange(topic)
                .exchange_kind(ExchangeKind::Fanout)
                .build(),
        }
    }
}
